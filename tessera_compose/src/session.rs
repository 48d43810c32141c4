// Copyright 2025 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The context object tying the components together.

use core::fmt;

use tessera_index::{Bounded, Rect};
use tessera_pool::{PoolStats, Recycle, RecyclePool, ReleaseError};
use tessera_region::{DrawStats, RegionMerger};

use crate::config::{Config, ConfigError};
use crate::container::{SpatialContainer, Widget, WidgetId};
use crate::dispatch::{DispatchCoordinator, DispatchStats, Dispatched};
use crate::event::Event;
use crate::render::DrawOutcome;
use crate::surface::DisplaySurface;

/// Counters of every component, see [`Session::stats`].
#[derive(Clone, Debug, PartialEq)]
pub struct SessionStats {
    /// Draw passes.
    pub draw: DrawStats,
    /// Object pooling.
    pub pool: PoolStats,
    /// Event routing.
    pub dispatch: DispatchStats,
}

/// Owns the dirty-region tracker, the widget pool, and the dispatcher of one
/// UI, plus the [`Config`] they were built from.
///
/// `T` is the pooled widget type and `A` the argument type its factories take.
/// Containers are owned by the host and passed in; the session creates them
/// with its index settings.
///
/// ```
/// use tessera_compose::{Config, DisplaySurface, DrawOutcome, Session, Widget};
/// use tessera_index::{Bounded, Rect};
/// use tessera_pool::Recycle;
///
/// #[derive(Default)]
/// struct Label { bounds: Rect, tag: Option<String> }
///
/// impl Bounded for Label {
///     fn bounds(&self) -> Rect { self.bounds }
/// }
/// impl Widget for Label {
///     type Payload = ();
///     fn set_bounds(&mut self, bounds: Rect) { self.bounds = bounds; }
/// }
/// impl Recycle for Label {
///     fn detach(&mut self) {}
///     fn set_pool_tag(&mut self, pool: &str) { self.tag = Some(pool.into()); }
///     fn pool_tag(&self) -> Option<&str> { self.tag.as_deref() }
/// }
///
/// struct Screen;
/// impl DisplaySurface for Screen {
///     fn resolution(&self) -> (u32, u32) { (80, 25) }
///     fn set_draw_clip(&mut self, _: i32, _: i32, _: i32, _: i32) {}
///     fn reset_draw_clip(&mut self) {}
/// }
///
/// let mut session: Session<Label, Rect> = Session::new();
/// session.pool_mut().register_factory("label", |bounds| Label { bounds: *bounds, tag: None });
///
/// let mut root = session.container(Rect::new(0, 0, 80, 25));
/// let id = session.spawn(&mut root, "label", &Rect::new(2, 2, 10, 1)).unwrap();
/// assert_eq!(session.draw(&root, &mut Screen), DrawOutcome::Partial { regions: 1 });
///
/// session.despawn(&mut root, id).unwrap().unwrap();
/// assert_eq!(session.pool().pool_size("label"), 1);
/// ```
pub struct Session<T, A = ()> {
    config: Config,
    regions: RegionMerger,
    pool: RecyclePool<T, A>,
    dispatcher: DispatchCoordinator,
}

impl<T: Recycle, A> Default for Session<T, A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Recycle, A> Session<T, A> {
    /// Creates a session with the default [`Config`].
    #[must_use]
    pub fn new() -> Self {
        Self::build(Config::default())
    }

    /// Creates a session after [validating](Config::validate) `config`.
    pub fn with_config(config: Config) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: Config) -> Self {
        Self {
            config,
            regions: RegionMerger::with_config(config.region),
            pool: RecyclePool::with_config(config.pool),
            dispatcher: DispatchCoordinator::new(),
        }
    }

    /// Configuration in effect.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Replaces the configuration.
    ///
    /// Region and pool limits take effect immediately. Index settings apply
    /// to containers created afterwards.
    pub fn apply_config(&mut self, config: Config) -> Result<(), ConfigError> {
        config.validate()?;
        self.config = config;
        self.regions.set_config(config.region);
        self.pool.set_config(config.pool);
        Ok(())
    }

    /// Overrides one setting by dotted key, see [`Config::apply_override`].
    pub fn apply_override(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut config = self.config;
        config.apply_override(key, value)?;
        self.apply_config(config)
    }

    /// The dirty-region tracker.
    #[must_use]
    pub fn regions(&self) -> &RegionMerger {
        &self.regions
    }

    /// Mutable access to the dirty-region tracker.
    pub fn regions_mut(&mut self) -> &mut RegionMerger {
        &mut self.regions
    }

    /// The widget pool.
    #[must_use]
    pub fn pool(&self) -> &RecyclePool<T, A> {
        &self.pool
    }

    /// Mutable access to the widget pool, for registering factories.
    pub fn pool_mut(&mut self) -> &mut RecyclePool<T, A> {
        &mut self.pool
    }

    /// The event dispatcher.
    #[must_use]
    pub fn dispatcher(&self) -> &DispatchCoordinator {
        &self.dispatcher
    }

    /// Mutable access to the event dispatcher.
    pub fn dispatcher_mut(&mut self) -> &mut DispatchCoordinator {
        &mut self.dispatcher
    }

    /// Marks the bounds of anything [`Bounded`] dirty.
    pub fn mark_dirty<B: Bounded + ?Sized>(&mut self, entity: &B) -> bool {
        self.regions.mark_dirty(entity)
    }

    /// Periodic housekeeping, see [`RecyclePool::auto_cleanup`].
    pub fn tick(&mut self, now_ms: u64) -> usize {
        self.pool.auto_cleanup(now_ms)
    }

    /// Counters of every component.
    #[must_use]
    pub fn stats(&self) -> SessionStats {
        SessionStats {
            draw: self.regions.stats(),
            pool: self.pool.stats(),
            dispatch: self.dispatcher.stats(),
        }
    }
}

impl<T: Widget + Recycle, A> Session<T, A> {
    /// An empty container using the session's index settings.
    #[must_use]
    pub fn container(&self, bounds: Rect) -> SpatialContainer<T> {
        SpatialContainer::with_config(bounds, self.config.index)
    }

    /// Draws one frame of `container`.
    pub fn draw<S: DisplaySurface>(
        &mut self,
        container: &SpatialContainer<T>,
        surface: &mut S,
    ) -> DrawOutcome {
        container.draw(&mut self.regions, surface)
    }

    /// Delivers one event to `container`.
    pub fn dispatch<F>(
        &mut self,
        container: &mut SpatialContainer<T>,
        event: &Event<T::Payload>,
        fallback: F,
    ) -> Dispatched
    where
        F: FnOnce(&Event<T::Payload>) -> bool,
    {
        container.dispatch(&mut self.dispatcher, event, fallback)
    }

    /// Takes a widget from pool `name` and adds it to `container`.
    ///
    /// Returns `None` if the pool is empty and has no factory.
    pub fn spawn(
        &mut self,
        container: &mut SpatialContainer<T>,
        name: &str,
        args: &A,
    ) -> Option<WidgetId> {
        let widget = self.pool.acquire(name, args)?;
        Some(container.add_child(&mut self.regions, widget))
    }

    /// Removes a widget from `container` and recycles it to the pool it came from.
    ///
    /// Returns `None` if `id` is stale. A refused release hands the widget
    /// back inside the error.
    pub fn despawn(
        &mut self,
        container: &mut SpatialContainer<T>,
        id: WidgetId,
    ) -> Option<Result<(), ReleaseError<T>>> {
        let widget = container.remove_child(&mut self.regions, id)?;
        Some(self.pool.recycle(widget))
    }
}

impl<T, A> fmt::Debug for Session<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("config", &self.config)
            .field("regions", &self.regions)
            .field("pool", &self.pool)
            .field("dispatcher", &self.dispatcher)
            .finish()
    }
}
