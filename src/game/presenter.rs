//! Presentation Adapter
//!
//! Routes simulation events to the outside world. A renderer, mixer and scene
//! graph each implement one sink; the presenter fans events out to them.
//! All three sinks are required: a scene without audio or visuals is a wiring
//! mistake, so `PresenterBuilder::build` refuses to produce one.

use tracing::{debug, info};

use crate::config::ConfigError;
use crate::core::vec2::FixedVec2;
use crate::game::events::{Cue, DestroyReason, GameEvent, GameEventData, VisualState};
use crate::game::player::Facing;
use crate::game::world::{EntityId, EntityKind};

/// Receives animator-facing state.
pub trait VisualSink {
    /// Animator state for an entity.
    fn set_visual_state(&mut self, entity: EntityId, state: VisualState);
    /// Horizontal mirroring for an entity.
    fn set_facing(&mut self, entity: EntityId, facing: Facing);
    /// Show or hide a turret's stun overlay.
    fn set_stun_overlay(&mut self, turret: EntityId, visible: bool);
}

/// Plays fire-and-forget audio cues.
pub trait AudioSink {
    /// Play a one-shot sound cue at an entity.
    fn play(&mut self, entity: EntityId, cue: Cue);
}

/// Mirrors entity lifecycle into a scene graph.
pub trait SceneSink {
    /// An entity entered the scene.
    fn on_spawn(&mut self, entity: EntityId, kind: EntityKind, position: FixedVec2, velocity: FixedVec2);
    /// An entity left the scene.
    fn on_destroy(&mut self, entity: EntityId, reason: DestroyReason);
}

/// Fans events out to the sinks.
pub struct Presenter {
    visual: Box<dyn VisualSink>,
    audio: Box<dyn AudioSink>,
    scene: Box<dyn SceneSink>,
}

impl Presenter {
    /// Start building a presenter.
    pub fn builder() -> PresenterBuilder {
        PresenterBuilder::default()
    }

    /// Deliver events in order.
    pub fn dispatch(&mut self, events: &[GameEvent]) {
        for event in events {
            self.dispatch_one(&event.data);
        }
    }

    fn dispatch_one(&mut self, data: &GameEventData) {
        match *data {
            GameEventData::VisualStateChanged { entity, state } => {
                self.visual.set_visual_state(entity, state);
            }
            GameEventData::FacingChanged { entity, facing } => {
                self.visual.set_facing(entity, facing);
            }
            GameEventData::StunOverlayChanged { turret, visible } => {
                self.visual.set_stun_overlay(turret, visible);
            }
            GameEventData::CuePlayed { entity, cue } => {
                self.audio.play(entity, cue);
            }
            GameEventData::Spawned { entity, kind, position, velocity } => {
                self.scene.on_spawn(entity, kind, position, velocity);
            }
            GameEventData::Destroyed { entity, reason } => {
                self.scene.on_destroy(entity, reason);
            }
            // Combat outcomes are already reflected in the events above
            GameEventData::ProjectileReflected { .. }
            | GameEventData::PlayerDamaged { .. }
            | GameEventData::TurretStunned { .. }
            | GameEventData::TurretRecovered { .. } => {}
        }
    }
}

/// Collects sinks; `build` fails if any is missing.
#[derive(Default)]
pub struct PresenterBuilder {
    visual: Option<Box<dyn VisualSink>>,
    audio: Option<Box<dyn AudioSink>>,
    scene: Option<Box<dyn SceneSink>>,
}

impl PresenterBuilder {
    /// Set the visual sink.
    pub fn visual(mut self, sink: impl VisualSink + 'static) -> Self {
        self.visual = Some(Box::new(sink));
        self
    }

    /// Set the audio sink.
    pub fn audio(mut self, sink: impl AudioSink + 'static) -> Self {
        self.audio = Some(Box::new(sink));
        self
    }

    /// Set the scene sink.
    pub fn scene(mut self, sink: impl SceneSink + 'static) -> Self {
        self.scene = Some(Box::new(sink));
        self
    }

    /// Wire the presenter.
    pub fn build(self) -> Result<Presenter, ConfigError> {
        Ok(Presenter {
            visual: self.visual.ok_or(ConfigError::MissingCollaborator("visual sink"))?,
            audio: self.audio.ok_or(ConfigError::MissingCollaborator("audio sink"))?,
            scene: self.scene.ok_or(ConfigError::MissingCollaborator("scene sink"))?,
        })
    }
}

/// Sinks that log instead of rendering. Used by the demo binary.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogSinks;

impl VisualSink for LogSinks {
    fn set_visual_state(&mut self, entity: EntityId, state: VisualState) {
        debug!(%entity, ?state, "visual");
    }

    fn set_facing(&mut self, entity: EntityId, facing: Facing) {
        debug!(%entity, ?facing, "facing");
    }

    fn set_stun_overlay(&mut self, turret: EntityId, visible: bool) {
        debug!(%turret, visible, "stun overlay");
    }
}

impl AudioSink for LogSinks {
    fn play(&mut self, entity: EntityId, cue: Cue) {
        info!(%entity, ?cue, "cue");
    }
}

impl SceneSink for LogSinks {
    fn on_spawn(&mut self, entity: EntityId, kind: EntityKind, position: FixedVec2, _velocity: FixedVec2) {
        info!(%entity, ?kind, %position, "spawn");
    }

    fn on_destroy(&mut self, entity: EntityId, reason: DestroyReason) {
        info!(%entity, ?reason, "destroy");
    }
}
