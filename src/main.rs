//! Laser Grid entry point
//!
//! The browser build runs through the library's wasm bindings. Natively this
//! plays one seeded session headlessly and prints the result.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use laser_grid::{Session, SessionPhase, Settings};

    env_logger::init();
    log::info!("Laser Grid (native) starting...");

    // Optional args: seed, rounds to survive before cashing out
    let mut args = std::env::args().skip(1);
    let seed = args
        .next()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or_else(rand::random);
    let cash_out_after = args.next().and_then(|s| s.parse::<u32>().ok()).unwrap_or(3);

    let mut session = Session::new(Settings::default(), seed);

    loop {
        match session.phase() {
            SessionPhase::Idle | SessionPhase::Playing => {
                if session.engine().survived_rounds() >= cash_out_after
                    && session.cash_out().is_some()
                {
                    continue;
                }
                session.click(0, 0);
            }
            SessionPhase::Locked => {
                if let Some(result) = session.fire() {
                    log::info!("Round resolved: {:?}", result);
                }
            }
            SessionPhase::Won | SessionPhase::Lost | SessionPhase::CashedOut => break,
        }
        for event in session.drain_events() {
            log::debug!("{:?}", event);
        }
    }

    match serde_json::to_string_pretty(&session.summary()) {
        Ok(json) => println!("{}", json),
        Err(e) => log::error!("Failed to serialize summary: {}", e),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_start in the library, this is just to satisfy the compiler
}
