//! Client input sampling with level and edge triggering

use macroquad::prelude::{is_key_down, KeyCode};
use shared::{Direction, Intent};

/// How held keys turn into per-tick intents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum InputMode {
    /// A held key contributes its direction on every tick
    #[default]
    Level,
    /// A key contributes only on the tick it goes down
    Edge,
}

/// Current held state of the four movement keys.
pub trait KeySource {
    fn is_down(&self, direction: Direction) -> bool;
}

/// Keyboard keys read through macroquad (arrow keys and WASD).
#[derive(Debug, Clone, Copy, Default)]
pub struct MacroquadKeys;

impl KeySource for MacroquadKeys {
    fn is_down(&self, direction: Direction) -> bool {
        match direction {
            Direction::Up => is_key_down(KeyCode::Up) || is_key_down(KeyCode::W),
            Direction::Down => is_key_down(KeyCode::Down) || is_key_down(KeyCode::S),
            Direction::Left => is_key_down(KeyCode::Left) || is_key_down(KeyCode::A),
            Direction::Right => is_key_down(KeyCode::Right) || is_key_down(KeyCode::D),
        }
    }
}

/// Polls a key source once per tick and produces the intent to send
pub struct InputSampler<K> {
    keys: K,
    mode: InputMode,
    // Previous tick's raw key state for edge detection
    prev_held: Intent,
}

impl<K: KeySource> InputSampler<K> {
    pub fn new(keys: K, mode: InputMode) -> Self {
        Self {
            keys,
            mode,
            prev_held: Intent::none(),
        }
    }

    pub fn mode(&self) -> InputMode {
        self.mode
    }

    pub fn keys_mut(&mut self) -> &mut K {
        &mut self.keys
    }

    pub fn sample(&mut self) -> Intent {
        let mut held = Intent::none();
        for direction in Direction::ALL {
            held.set(direction, self.keys.is_down(direction));
        }

        let intent = match self.mode {
            InputMode::Level => held,
            InputMode::Edge => {
                let mut pressed = Intent::none();
                for direction in held.directions() {
                    // Detect key press events (current && !previous)
                    if !self.prev_held.contains(direction) {
                        pressed.set(direction, true);
                    }
                }
                pressed
            }
        };

        self.prev_held = held;
        intent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct FakeKeys {
        held: Intent,
    }

    impl KeySource for FakeKeys {
        fn is_down(&self, direction: Direction) -> bool {
            self.held.contains(direction)
        }
    }

    #[test]
    fn test_level_mode_repeats_while_held() {
        let mut sampler = InputSampler::new(FakeKeys::default(), InputMode::Level);
        sampler.keys_mut().held = Intent::from_directions([Direction::Up, Direction::Left]);

        for _ in 0..3 {
            let intent = sampler.sample();
            assert!(intent.up);
            assert!(intent.left);
            assert!(!intent.down);
            assert!(!intent.right);
        }

        sampler.keys_mut().held = Intent::none();
        assert!(sampler.sample().is_empty());
    }

    #[test]
    fn test_edge_mode_fires_once_per_press() {
        let mut sampler = InputSampler::new(FakeKeys::default(), InputMode::Edge);
        sampler.keys_mut().held = Intent::from_directions([Direction::Right]);

        assert_eq!(sampler.sample(), Intent::from_directions([Direction::Right]));
        assert!(sampler.sample().is_empty());

        // A second key goes down while the first is still held
        sampler.keys_mut().held = Intent::from_directions([Direction::Right, Direction::Down]);
        assert_eq!(sampler.sample(), Intent::from_directions([Direction::Down]));

        // Release and press again
        sampler.keys_mut().held = Intent::none();
        assert!(sampler.sample().is_empty());
        sampler.keys_mut().held = Intent::from_directions([Direction::Right]);
        assert_eq!(sampler.sample(), Intent::from_directions([Direction::Right]));
    }

    #[test]
    fn test_default_mode_is_level() {
        let sampler = InputSampler::new(FakeKeys::default(), InputMode::default());
        assert_eq!(sampler.mode(), InputMode::Level);
    }
}
