/// Entry point and game loop.

mod config;
mod domain;
mod error;
mod logging;
mod sim;
mod ui;

use std::time::{Duration, Instant};

use crossterm::event::KeyCode;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use tracing::{debug, info};

use config::GameConfig;
use error::GameError;
use sim::level;
use sim::step;
use sim::world::{Phase, WorldState};
use ui::gamepad::GamepadState;
use ui::input::InputState;
use ui::renderer::Renderer;
use ui::sound::{self, SoundEngine};

const FRAME_SLEEP: Duration = Duration::from_millis(5);

const KEYS_QUIT: &[KeyCode] = &[KeyCode::Esc, KeyCode::Char('q'), KeyCode::Char('Q')];
const KEYS_PAUSE: &[KeyCode] = &[KeyCode::F(1), KeyCode::Char('p'), KeyCode::Char('P')];

fn main() {
    let config = GameConfig::load();
    logging::setup_logging(&config.log_file);

    match run(&config) {
        Ok(score) => {
            println!();
            println!("Thanks for playing!");
            println!("Final Score: {score}");
        }
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

/// Load the maze, take over the terminal and play until the user quits.
/// Returns the final score.
fn run(config: &GameConfig) -> Result<u32, GameError> {
    info!(
        tick_ms = config.rules.tick_rate_ms,
        power_ticks = config.rules.power_mode_ticks,
        food_for_power = config.rules.food_for_power,
        lives = config.rules.starting_lives,
        "config loaded"
    );

    // Level problems surface here, before raw mode.
    let def = level::load_level_def(config.level_file.as_deref())?;
    let now = Instant::now();
    let mut world = WorldState::new(&def, config.rules.clone(), now)?;

    let seed = config.seed.unwrap_or_else(|| rand::rng().random());
    info!(seed, "rng seeded");
    let mut rng = Pcg32::seed_from_u64(seed);
    step::restart(&mut world, &mut rng, now);

    let mut renderer = Renderer::new();
    if let Err(e) = renderer.init() {
        let _ = renderer.cleanup();
        return Err(e.into());
    }

    let sound = SoundEngine::new(&config.sound);

    let result = game_loop(&mut world, &mut rng, &mut renderer, sound.as_ref(), config);

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }

    result?;
    info!(score = world.session.score, "session closed");
    Ok(world.session.score)
}

fn game_loop(
    world: &mut WorldState,
    rng: &mut Pcg32,
    renderer: &mut Renderer,
    sound: Option<&SoundEngine>,
    config: &GameConfig,
) -> Result<(), GameError> {
    let mut kb = InputState::new();
    let mut gp = GamepadState::new();
    gp.load_button_config(&config.gamepad);
    info!(connected = gp.connected, "gamepad");
    let mut last_tick = Instant::now();
    let tick_rate = Duration::from_millis(world.rules.tick_rate_ms);

    loop {
        kb.drain_events();
        gp.update();

        if kb.ctrl_c_pressed() || kb.any_pressed(KEYS_QUIT) || gp.quit_pressed() {
            info!("quit requested");
            break;
        }

        handle_input(world, rng, &kb, &gp);

        if last_tick.elapsed() >= tick_rate {
            let now = Instant::now();
            let events = step::step(world, rng, now);
            for ev in &events {
                debug!(tick = world.tick, ?ev, "event");
            }
            if let Some(sfx) = sound {
                for cue in sound::cues_for(&events) {
                    sfx.play(cue);
                }
            }
            last_tick = now;
        }

        renderer.render(world, Instant::now())?;
        std::thread::sleep(FRAME_SLEEP);
    }

    Ok(())
}

/// Route this frame's input to the world: restart, pause, or steer.
/// A direction key that restarts the game also becomes the first move.
fn handle_input(world: &mut WorldState, rng: &mut Pcg32, kb: &InputState, gp: &GamepadState) {
    let steer = kb.direction().or_else(|| gp.direction_pressed());
    match world.phase {
        Phase::GameOver => {
            if kb.any_key() || gp.any_pressed() {
                step::restart(world, rng, Instant::now());
                if let Some(dir) = steer {
                    world.queue_direction(dir);
                }
            }
        }
        Phase::Playing => {
            if kb.any_pressed(KEYS_PAUSE) || gp.pause_pressed() {
                world.toggle_pause();
                debug!(paused = world.paused, "pause toggled");
                return;
            }
            if world.paused {
                return;
            }
            if let Some(dir) = steer {
                world.queue_direction(dir);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEvent, KeyModifiers};

    use crate::config::RulesConfig;
    use crate::domain::entity::Direction;

    fn game_over_world(rng: &mut Pcg32) -> WorldState {
        let mut w = WorldState::new(&level::embedded_level(), RulesConfig::default(), Instant::now()).unwrap();
        step::restart(&mut w, rng, Instant::now());
        w.session.lives = 0;
        w.session.score = 340;
        w.phase = Phase::GameOver;
        w
    }

    #[test]
    fn direction_key_restarts_and_steers() {
        let mut rng = Pcg32::seed_from_u64(4);
        let mut w = game_over_world(&mut rng);
        let mut kb = InputState::new();
        kb.raw_events.push(KeyEvent::new(KeyCode::Left, KeyModifiers::NONE));

        handle_input(&mut w, &mut rng, &kb, &GamepadState::new());

        assert_eq!(w.phase, Phase::Playing);
        assert_eq!(w.session.score, 0);
        assert_eq!(w.player.next_direction, Some(Direction::Left));
    }

    #[test]
    fn other_key_restarts_without_steering() {
        let mut rng = Pcg32::seed_from_u64(4);
        let mut w = game_over_world(&mut rng);
        let mut kb = InputState::new();
        kb.raw_events.push(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));

        handle_input(&mut w, &mut rng, &kb, &GamepadState::new());

        assert_eq!(w.phase, Phase::Playing);
        assert_eq!(w.session.lives, 3);
        assert_eq!(w.player.next_direction, None);
    }
}
