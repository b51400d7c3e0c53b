use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

use crossterm::event::{read, Event, KeyCode, KeyEvent, KeyModifiers};

use crate::snake::Direction;

/// Single-slot handoff between the key-reader thread and the update
/// loop. A new direction overwrites an unconsumed one (latest wins,
/// never queued); the loop drains the slot at most once per tick. Quit
/// travels on its own flag so a direction pressed right after it cannot
/// mask it.
#[derive(Clone, Default)]
pub struct InputMailbox {
    slot: Arc<Mutex<Option<Direction>>>,
    quit: Arc<AtomicBool>,
}

impl InputMailbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn offer_direction(&self, direction: Direction) {
        *self.slot.lock().unwrap() = Some(direction);
    }

    /// Non-blocking consume; empties the slot.
    pub fn take_direction(&self) -> Option<Direction> {
        self.slot.lock().unwrap().take()
    }

    pub fn request_quit(&self) {
        self.quit.store(true, Ordering::Relaxed);
    }

    pub fn quit_requested(&self) -> bool {
        self.quit.load(Ordering::Relaxed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    Turn(Direction),
    Quit,
    Ignore,
}

/// Arrow keys and WASD steer, q / Esc / Ctrl+C quit, anything else is
/// ignored.
pub fn map_key(ev: &KeyEvent) -> KeyCommand {
    if ev.modifiers.contains(KeyModifiers::CONTROL) && ev.code == KeyCode::Char('c') {
        return KeyCommand::Quit;
    }

    match ev.code {
        KeyCode::Up | KeyCode::Char('w') => KeyCommand::Turn(Direction::Up),
        KeyCode::Down | KeyCode::Char('s') => KeyCommand::Turn(Direction::Down),
        KeyCode::Left | KeyCode::Char('a') => KeyCommand::Turn(Direction::Left),
        KeyCode::Right | KeyCode::Char('d') => KeyCommand::Turn(Direction::Right),
        KeyCode::Char('q') | KeyCode::Esc => KeyCommand::Quit,
        _ => KeyCommand::Ignore,
    }
}

/// Spawns the reader thread. It blocks on terminal events for the life
/// of the process and never touches game state; everything it learns
/// goes through the mailbox.
pub fn spawn_input_reader(mailbox: InputMailbox) {
    thread::spawn(move || loop {
        let ev = match read() {
            Ok(Event::Key(ev)) => ev,
            Ok(_) => continue,
            Err(_) => {
                // Terminal is gone; treat it as a quit.
                mailbox.request_quit();
                return;
            }
        };

        match map_key(&ev) {
            KeyCommand::Turn(direction) => mailbox.offer_direction(direction),
            KeyCommand::Quit => {
                mailbox.request_quit();
                return;
            }
            KeyCommand::Ignore => {}
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent { code, modifiers: KeyModifiers::NONE }
    }

    #[test]
    fn latest_direction_wins() {
        let mailbox = InputMailbox::new();
        mailbox.offer_direction(Direction::Up);
        mailbox.offer_direction(Direction::Left);

        assert_eq!(mailbox.take_direction(), Some(Direction::Left));
    }

    #[test]
    fn slot_is_consumed_exactly_once() {
        let mailbox = InputMailbox::new();
        mailbox.offer_direction(Direction::Down);

        assert_eq!(mailbox.take_direction(), Some(Direction::Down));
        assert_eq!(mailbox.take_direction(), None);
    }

    #[test]
    fn quit_survives_a_later_direction() {
        let mailbox = InputMailbox::new();
        mailbox.request_quit();
        mailbox.offer_direction(Direction::Right);

        assert!(mailbox.quit_requested());
        assert_eq!(mailbox.take_direction(), Some(Direction::Right));
    }

    #[test]
    fn arrow_keys_map_to_directions() {
        assert_eq!(map_key(&key(KeyCode::Up)), KeyCommand::Turn(Direction::Up));
        assert_eq!(map_key(&key(KeyCode::Down)), KeyCommand::Turn(Direction::Down));
        assert_eq!(map_key(&key(KeyCode::Left)), KeyCommand::Turn(Direction::Left));
        assert_eq!(map_key(&key(KeyCode::Right)), KeyCommand::Turn(Direction::Right));
    }

    #[test]
    fn wasd_maps_to_directions() {
        assert_eq!(map_key(&key(KeyCode::Char('w'))), KeyCommand::Turn(Direction::Up));
        assert_eq!(map_key(&key(KeyCode::Char('a'))), KeyCommand::Turn(Direction::Left));
        assert_eq!(map_key(&key(KeyCode::Char('s'))), KeyCommand::Turn(Direction::Down));
        assert_eq!(map_key(&key(KeyCode::Char('d'))), KeyCommand::Turn(Direction::Right));
    }

    #[test]
    fn quit_keys() {
        assert_eq!(map_key(&key(KeyCode::Char('q'))), KeyCommand::Quit);
        assert_eq!(map_key(&key(KeyCode::Esc)), KeyCommand::Quit);

        let ctrl_c = KeyEvent { code: KeyCode::Char('c'), modifiers: KeyModifiers::CONTROL };
        assert_eq!(map_key(&ctrl_c), KeyCommand::Quit);
    }

    #[test]
    fn other_keys_are_ignored() {
        assert_eq!(map_key(&key(KeyCode::Char('x'))), KeyCommand::Ignore);
        assert_eq!(map_key(&key(KeyCode::Enter)), KeyCommand::Ignore);
    }
}
