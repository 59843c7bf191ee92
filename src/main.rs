//! Ballpit entry point
//!
//! Runs a scripted headless session. Windowing and input translation live
//! outside this crate; this binary drives the simulation with canned input
//! and logs what a renderer would receive.
//!
//! Usage: `ballpit [config.json]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Ballpit (headless) starting...");

    let config = match std::env::args().nth(1) {
        Some(path) => match ballpit::SimConfig::load(&path) {
            Ok(config) => config,
            Err(e) => {
                log::error!("Failed to load config {}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => ballpit::SimConfig::default(),
    };

    if let Err(e) = headless::run(config) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use ballpit::consts::TICK_RATE;
    use ballpit::sim::{Direction, Frame, TickInput, Vector2, World, tick};
    use ballpit::{SimConfig, SimResult};

    /// Seconds of simulated time in the scripted session
    const SESSION_SECONDS: u64 = 12;

    /// Canned input for a given tick
    fn script(t: u64, world: &World) -> TickInput {
        let second = |s: u64| s * u64::from(TICK_RATE);
        let mut input = TickInput::default();

        if t == second(1) {
            input.directions.push((Direction::Right, true));
        } else if t == second(3) {
            input.directions.push((Direction::Right, false));
            input.directions.push((Direction::Down, true));
        } else if t == second(4) {
            input.directions.push((Direction::Down, false));
        }

        // Charge a ball for one second and drop it ahead of the controller
        if t == second(5) {
            input.begin_charge = true;
        } else if t == second(6) {
            let ahead = world
                .controller_body()
                .map(|b| b.pos + Vector2::new(150.0, 0.0))
                .unwrap_or(Vector2::ZERO);
            input.release_charge = Some(ahead);
        }

        // A handful of small balls to crowd the grid
        if (second(7)..second(8)).contains(&t) && t % 6 == 0 {
            input.begin_charge = true;
        } else if (second(7)..second(8)).contains(&t) && t % 6 == 3 {
            let offset = (t % 60) as f64 * 4.0;
            input.release_charge = Some(Vector2::new(-200.0 + offset, 120.0));
        }

        if t == second(10) {
            input.clear = true;
        }
        input
    }

    fn report(frame: &Frame) {
        log::info!(
            "t={:>4} bodies={:>3} visible={:>3} contacts={:>3} cell={:.0} cells={:>3} scroll=({:.1}, {:.1})",
            frame.tick,
            frame.body_count,
            frame.visible.len(),
            frame.contacts,
            frame.cell_size,
            frame.occupied_cells.len(),
            frame.scroll.x,
            frame.scroll.y
        );
    }

    pub fn run(config: SimConfig) -> SimResult<()> {
        log::info!(
            "Preset {}, broad phase {:?}, restitution {}",
            config.preset.as_str(),
            config.broad_phase,
            config.restitution
        );
        let mut world = World::with_seed_scene(config)?;

        let total = SESSION_SECONDS * u64::from(TICK_RATE);
        for t in 1..=total {
            let input = script(t, &world);
            let frame = tick(&mut world, &input);
            if t % u64::from(TICK_RATE) == 0 {
                report(&frame);
            }
        }

        log::info!("Session finished with {} bodies", world.body_count());
        Ok(())
    }
}
