//! Pre-game menu where the player picks a name and a color

use rand::Rng;
use shared::{Color, Handshake};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuEvent {
    Char(char),
    Backspace,
    RerollColor,
    Submit,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuOutcome {
    Continue,
    Submit(Handshake),
    Quit,
}

pub struct MenuState<R> {
    name: String,
    color: Color,
    max_name_chars: usize,
    rng: R,
}

impl<R> MenuState<R> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn color(&self) -> Color {
        self.color
    }
}

impl<R: Rng> MenuState<R> {
    pub fn new(mut rng: R, max_name_chars: usize) -> Self {
        let color = random_color(&mut rng);
        Self {
            name: String::new(),
            color,
            max_name_chars,
            rng,
        }
    }

    pub fn handle(&mut self, event: MenuEvent) -> MenuOutcome {
        match event {
            MenuEvent::Char(c) => {
                if c.is_alphanumeric() && self.name.chars().count() < self.max_name_chars {
                    self.name.push(c);
                }
            }
            MenuEvent::Backspace => {
                self.name.pop();
            }
            MenuEvent::RerollColor => {
                self.color = random_color(&mut self.rng);
            }
            MenuEvent::Submit => {
                if !self.name.is_empty() {
                    return MenuOutcome::Submit(Handshake::new(self.color, self.name.clone()));
                }
            }
            MenuEvent::Quit => return MenuOutcome::Quit,
        }
        MenuOutcome::Continue
    }

    /// Feeds events in order, stopping at the first one that ends the menu.
    pub fn handle_all(&mut self, events: impl IntoIterator<Item = MenuEvent>) -> MenuOutcome {
        for event in events {
            let outcome = self.handle(event);
            if outcome != MenuOutcome::Continue {
                return outcome;
            }
        }
        MenuOutcome::Continue
    }
}

pub fn random_color<R: Rng + ?Sized>(rng: &mut R) -> Color {
    Color::new(rng.gen(), rng.gen(), rng.gen())
}
