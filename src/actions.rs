use log::debug;

/// Named handlers over some host context `C`.
///
/// The original tool wired menus, keystrokes and popups to shared command
/// objects; hosts get the same sharing here through a flat name -> handler
/// map with no UI toolkit in sight. The core library never calls into this.
pub struct ActionRegistry<C> {
    actions: Vec<(String, Box<dyn FnMut(&mut C)>)>,
}

impl<C> Default for ActionRegistry<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> ActionRegistry<C> {
    pub fn new() -> Self {
        Self {
            actions: Vec::new(),
        }
    }

    /// Register `handler` under `name`, replacing any previous binding.
    pub fn register<F>(&mut self, name: &str, handler: F)
    where
        F: FnMut(&mut C) + 'static,
    {
        if let Some(slot) = self.actions.iter_mut().find(|(n, _)| n == name) {
            debug!("Rebinding action {:?}", name);
            slot.1 = Box::new(handler);
        } else {
            self.actions.push((name.to_string(), Box::new(handler)));
        }
    }

    /// Run the handler bound to `name`; false when nothing is bound.
    pub fn invoke(&mut self, name: &str, ctx: &mut C) -> bool {
        match self.actions.iter_mut().find(|(n, _)| n == name) {
            Some((_, handler)) => {
                handler(ctx);
                true
            }
            None => {
                debug!("No action bound to {:?}", name);
                false
            }
        }
    }

    /// Registration-order action names, for menu building.
    pub fn names(&self) -> Vec<&str> {
        self.actions.iter().map(|(n, _)| n.as_str()).collect()
    }
}
