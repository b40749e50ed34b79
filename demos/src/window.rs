use crate::demos::Demo;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Key {
    Escape,
    Up,
    Down,
    Other,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum KeyState {
    Pressed,
    Released,
}

/// Window input, already translated from the windowing library.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DemoEvent {
    Key { key: Key, state: KeyState },
    Resized { width: u32, height: u32 },
    CloseRequested,
}

/// What the event loop has to do after an event was dispatched.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Dispatch {
    Ignored,
    Forwarded,
    Resized { width: u32, height: u32 },
    Close,
}

/// Window behavior shared by all demos.
#[derive(Debug)]
pub struct WindowState {
    width: u32,
    height: u32,
}

impl WindowState {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn dispatch(&mut self, event: DemoEvent, demo: &mut dyn Demo) -> Dispatch {
        match event {
            DemoEvent::CloseRequested
            | DemoEvent::Key {
                key: Key::Escape,
                state: KeyState::Released,
            } => Dispatch::Close,
            DemoEvent::Key {
                key,
                state: KeyState::Released,
            } => {
                demo.on_key(key);
                Dispatch::Forwarded
            }
            DemoEvent::Key { .. } => Dispatch::Ignored,
            DemoEvent::Resized { width, height } => {
                if width == 0 || height == 0 || (width, height) == self.size() {
                    return Dispatch::Ignored;
                }

                self.width = width;
                self.height = height;
                Dispatch::Resized { width, height }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use gl_wrapper::renderer::GlRenderer;
    use gl_wrapper::NativeGl;

    use super::*;
    use crate::demos::DemoError;

    #[derive(Default)]
    struct KeyRecorder {
        keys: Vec<Key>,
    }

    impl Demo for KeyRecorder {
        fn title(&self) -> &'static str {
            "recorder"
        }

        fn init(&mut self, _gl: &NativeGl) -> Result<(), DemoError> {
            Ok(())
        }

        fn render(&mut self, _renderer: &mut GlRenderer, _elapsed: Duration) {}

        fn on_key(&mut self, key: Key) {
            self.keys.push(key);
        }

        fn release(&mut self) {}
    }

    fn key(key: Key, state: KeyState) -> DemoEvent {
        DemoEvent::Key { key, state }
    }

    #[test]
    fn escape_release_closes() {
        let mut state = WindowState::new(1024, 768);
        let mut demo = KeyRecorder::default();

        assert_eq!(
            state.dispatch(key(Key::Escape, KeyState::Pressed), &mut demo),
            Dispatch::Ignored
        );

        assert_eq!(
            state.dispatch(key(Key::Escape, KeyState::Released), &mut demo),
            Dispatch::Close
        );
        assert!(demo.keys.is_empty());
    }

    #[test]
    fn close_button_closes() {
        let mut state = WindowState::new(1024, 768);
        let mut demo = KeyRecorder::default();

        assert_eq!(
            state.dispatch(DemoEvent::CloseRequested, &mut demo),
            Dispatch::Close
        );
    }

    #[test]
    fn only_releases_reach_the_demo() {
        let mut state = WindowState::new(1024, 768);
        let mut demo = KeyRecorder::default();

        state.dispatch(key(Key::Up, KeyState::Pressed), &mut demo);
        state.dispatch(key(Key::Up, KeyState::Released), &mut demo);
        state.dispatch(key(Key::Other, KeyState::Released), &mut demo);

        assert_eq!(demo.keys, vec![Key::Up, Key::Other]);
    }

    #[test]
    fn resize_needs_a_new_positive_size() {
        let mut state = WindowState::new(1024, 768);
        let mut demo = KeyRecorder::default();

        let resize = |width, height| DemoEvent::Resized { width, height };

        assert_eq!(state.dispatch(resize(0, 600), &mut demo), Dispatch::Ignored);
        assert_eq!(
            state.dispatch(resize(1024, 768), &mut demo),
            Dispatch::Ignored
        );
        assert_eq!(
            state.dispatch(resize(800, 600), &mut demo),
            Dispatch::Resized {
                width: 800,
                height: 600
            }
        );
        assert_eq!(state.size(), (800, 600));
    }
}
