use crate::game::LocalPlayerTracker;
use crate::menu::MenuState;
use macroquad::prelude::*;
use shared::{Color as EntityColor, Food, Handshake, Player};

/// Consumer of decoded snapshots, called once per tick.
pub trait RenderSurface {
    fn render(&mut self, status: u8, food: &[Food], players: &[Player]);
}

/// Indices of `players` from smallest to largest radius, so bigger blobs are
/// drawn over the ones they are eating.
pub fn draw_order(players: &[Player]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..players.len()).collect();
    order.sort_by(|&a, &b| players[a].radius.total_cmp(&players[b].radius));
    order
}

fn to_color(color: EntityColor) -> Color {
    Color::from_rgba(color.r, color.g, color.b, 255)
}

pub struct Renderer {
    width: f32,
    height: f32,
    local_player: Option<LocalPlayerTracker>,
}

impl Renderer {
    pub fn new(width: usize, height: usize) -> Self {
        Renderer {
            width: width as f32,
            height: height as f32,
            local_player: None,
        }
    }

    /// Starts highlighting the blob that matches this handshake.
    pub fn track_local_player(&mut self, handshake: &Handshake) {
        self.local_player = Some(LocalPlayerTracker::new(handshake));
    }

    fn draw_food(&self, food: &Food) {
        draw_circle(food.x as f32, food.y as f32, food.radius, to_color(food.color));
    }

    fn draw_player(&self, player: &Player, is_local_player: bool) {
        let (x, y) = (player.x as f32, player.y as f32);
        draw_circle(x, y, player.radius, to_color(player.color));

        if is_local_player {
            draw_circle_lines(x, y, player.radius + 2.0, 3.0, WHITE);
        }

        let font_size = (player.radius / 2.0).max(1.0) as u16;
        let dims = measure_text(&player.name, None, font_size, 1.0);
        draw_text(
            &player.name,
            x - dims.width / 2.0,
            y + dims.offset_y / 2.0,
            font_size as f32,
            BLACK,
        );
    }

    fn draw_ui(&self, status: u8, player_count: usize) {
        draw_text(&format!("status {}", status), 10.0, 20.0, 16.0, BLACK);
        draw_text(
            &format!("{} players", player_count),
            10.0,
            38.0,
            16.0,
            BLACK,
        );
    }

    /// Draws the name/color selection screen.
    pub fn draw_menu<R>(&self, menu: &MenuState<R>) {
        clear_background(Color::from_rgba(235, 235, 235, 255));
        let (center_x, center_y) = (self.width / 2.0, self.height / 2.0);

        draw_circle(center_x, center_y, 100.0, to_color(menu.color()));

        let header = "Agar.IO";
        let dims = measure_text(header, None, 120, 1.0);
        draw_text(
            header,
            center_x - dims.width / 2.0,
            self.height / 4.0,
            120.0,
            BLACK,
        );

        let dims = measure_text(menu.name(), None, 30, 1.0);
        draw_text(
            menu.name(),
            center_x - dims.width / 2.0,
            center_y + dims.offset_y / 2.0,
            30.0,
            BLACK,
        );

        let (field_width, field_height) = (400.0, 40.0);
        let field_x = center_x - field_width / 2.0;
        let field_y = self.height - self.height / 4.0;
        draw_rectangle_lines(field_x, field_y, field_width, field_height, 2.0, BLACK);
        draw_text("Name:", field_x + 5.0, field_y - 8.0, 30.0, BLACK);
        draw_text(menu.name(), field_x + 5.0, field_y + 30.0, 30.0, BLACK);

        let help = "Type your username, press <CTRL> to change color, press <ENTER> to play!";
        let dims = measure_text(help, None, 20, 1.0);
        draw_text(
            help,
            center_x - dims.width / 2.0,
            self.height - 10.0,
            20.0,
            BLACK,
        );
    }
}

impl RenderSurface for Renderer {
    fn render(&mut self, status: u8, food: &[Food], players: &[Player]) {
        clear_background(Color::from_rgba(235, 235, 235, 255));

        for item in food {
            self.draw_food(item);
        }

        let local_index = self
            .local_player
            .as_mut()
            .and_then(|tracker| tracker.locate(players));

        for index in draw_order(players) {
            self.draw_player(&players[index], Some(index) == local_index);
        }

        self.draw_ui(status, players.len());
    }
}
