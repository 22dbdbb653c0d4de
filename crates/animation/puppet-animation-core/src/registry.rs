//! Ownership arena for every loaded avatar's animation set.
//!
//! The registry is driven by the single simulation thread: all mutation goes
//! through `&mut self`, while renderers and other readers borrow read-only
//! views. Each avatar entry owns its script host, so per-tick fan-out can
//! hand the host to every animation the avatar owns without aliasing.

use std::sync::Arc;

use hashbrown::HashMap;

use crate::animation::Animation;
use crate::error::AnimationError;
use crate::ids::AvatarId;
use crate::script::ScriptHost;
use crate::time::SharedClock;

/// One avatar's animations plus the script host executing its code events.
#[derive(Debug)]
struct AvatarEntry<H> {
    host: H,
    animations: Vec<Animation>,
}

/// Registry of all loaded avatars' animations.
///
/// Fan-out driver for the per-step `tick()`, game pause/resume, and avatar
/// unload. The `suspended` switch halts every fan-out at once (the host's
/// panic button) and is explicit state here rather than a process-wide flag.
#[derive(Debug)]
pub struct AnimationRegistry<H> {
    clock: SharedClock,
    avatars: HashMap<AvatarId, AvatarEntry<H>>,
    suspended: bool,
}

impl<H: ScriptHost> AnimationRegistry<H> {
    pub fn new(clock: SharedClock) -> Self {
        Self {
            clock,
            avatars: HashMap::new(),
            suspended: false,
        }
    }

    /// Clock shared with every animation loaded into this registry.
    pub fn clock(&self) -> SharedClock {
        Arc::clone(&self.clock)
    }

    // -- avatar lifecycle -- //

    /// Register `id` with its script host. Loading an already-loaded avatar
    /// replaces the previous entry, dropping its animations.
    pub fn load_avatar(&mut self, id: AvatarId, host: H) {
        let previous = self.avatars.insert(
            id,
            AvatarEntry {
                host,
                animations: Vec::new(),
            },
        );
        if previous.is_some() {
            log::debug!("replaced avatar {id}");
        } else {
            log::debug!("loaded avatar {id}");
        }
    }

    /// Stop and discard everything the avatar owns.
    pub fn clear_avatar(&mut self, id: AvatarId) {
        if let Some(mut entry) = self.avatars.remove(&id) {
            for animation in &mut entry.animations {
                animation.stop();
            }
            log::debug!("cleared avatar {id}");
        }
    }

    /// Unload every avatar.
    pub fn clear_all(&mut self) {
        let ids: Vec<AvatarId> = self.avatars.keys().copied().collect();
        for id in ids {
            self.clear_avatar(id);
        }
    }

    /// Attach an animation to a loaded avatar.
    pub fn add_animation(
        &mut self,
        avatar: AvatarId,
        animation: Animation,
    ) -> Result<(), AnimationError> {
        let entry = self
            .avatars
            .get_mut(&avatar)
            .ok_or(AnimationError::AvatarNotLoaded { id: avatar })?;
        entry.animations.push(animation);
        Ok(())
    }

    // -- per-step fan-out -- //

    /// Advance every animation of every avatar by one simulation step.
    /// Must be called exactly once per step by the driving thread.
    pub fn tick_all(&mut self) {
        if self.suspended {
            return;
        }
        for entry in self.avatars.values_mut() {
            let AvatarEntry { host, animations } = entry;
            for animation in animations.iter_mut() {
                animation.tick(host);
            }
        }
    }

    /// Fan out a host game-pause event.
    pub fn game_pause_all(&mut self) {
        if self.suspended {
            return;
        }
        for entry in self.avatars.values_mut() {
            for animation in &mut entry.animations {
                animation.game_pause();
            }
        }
    }

    /// Fan out a host game-resume event.
    pub fn game_resume_all(&mut self) {
        if self.suspended {
            return;
        }
        for entry in self.avatars.values_mut() {
            for animation in &mut entry.animations {
                animation.game_resume();
            }
        }
    }

    /// Stop every animation of one avatar without unloading it.
    pub fn stop_all(&mut self, avatar: AvatarId) {
        if let Some(entry) = self.avatars.get_mut(&avatar) {
            for animation in &mut entry.animations {
                animation.stop();
            }
        }
    }

    /// Halt all fan-out operations until resumed.
    pub fn set_suspended(&mut self, suspended: bool) {
        self.suspended = suspended;
    }

    #[inline]
    pub fn is_suspended(&self) -> bool {
        self.suspended
    }

    // -- read access -- //

    #[inline]
    pub fn is_loaded(&self, avatar: AvatarId) -> bool {
        self.avatars.contains_key(&avatar)
    }

    #[inline]
    pub fn avatar_count(&self) -> usize {
        self.avatars.len()
    }

    pub fn animations(&self, avatar: AvatarId) -> Option<&[Animation]> {
        self.avatars
            .get(&avatar)
            .map(|entry| entry.animations.as_slice())
    }

    pub fn animations_mut(&mut self, avatar: AvatarId) -> Option<&mut [Animation]> {
        self.avatars
            .get_mut(&avatar)
            .map(|entry| entry.animations.as_mut_slice())
    }

    pub fn host(&self, avatar: AvatarId) -> Option<&H> {
        self.avatars.get(&avatar).map(|entry| &entry.host)
    }

    pub fn host_mut(&mut self, avatar: AvatarId) -> Option<&mut H> {
        self.avatars.get_mut(&avatar).map(|entry| &mut entry.host)
    }

    /// Look up one animation by model and animation name.
    pub fn find(&self, avatar: AvatarId, model: &str, name: &str) -> Option<&Animation> {
        self.animations(avatar)?
            .iter()
            .find(|a| a.model_name() == model && a.name() == name)
    }

    pub fn find_mut(
        &mut self,
        avatar: AvatarId,
        model: &str,
        name: &str,
    ) -> Option<&mut Animation> {
        self.animations_mut(avatar)?
            .iter_mut()
            .find(|a| a.model_name() == model && a.name() == name)
    }

    /// Group an avatar's animations by model name, then animation name —
    /// the shape the embedding script environment exposes to user code.
    pub fn animation_table(&self, avatar: AvatarId) -> HashMap<&str, HashMap<&str, &Animation>> {
        let mut root: HashMap<&str, HashMap<&str, &Animation>> = HashMap::new();
        if let Some(animations) = self.animations(avatar) {
            for animation in animations {
                root.entry(animation.model_name())
                    .or_default()
                    .insert(animation.name(), animation);
            }
        }
        root
    }
}
