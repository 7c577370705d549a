//! Map Station - native entry point
//!
//! The games run in the browser through the wasm exports. Natively this
//! plays a few seconds of a session headless and prints the final SVG:
//!
//! ```text
//! map-station asteroids|snake [features.geojson] > frame.svg
//! ```

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    if let Err(e) = native::run() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry points are the exports in `platform`
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::error::Error;

    use glam::DVec2;
    use map_station::geo::{Feature, FeatureCollection};
    use map_station::platform::Session;
    use map_station::sim::{AsteroidsGame, SnakeGame};
    use map_station::{Action, KeyBindings, Settings};

    /// Seconds of play before the snapshot
    const PLAY_SECONDS: usize = 5;

    fn demo_features() -> FeatureCollection {
        let square = |x: f64, y: f64, side: f64| {
            vec![
                DVec2::new(x, y),
                DVec2::new(x + side, y),
                DVec2::new(x + side, y + side),
                DVec2::new(x, y + side),
                DVec2::new(x, y),
            ]
        };
        FeatureCollection::new(vec![
            Feature::polygon(vec![square(0.0, 0.0, 10.0)]).with_property("name", "North"),
            Feature::polygon(vec![square(14.0, 2.0, 6.0)]).with_property("name", "East"),
            Feature::polygon(vec![square(3.0, 13.0, 8.0)]).with_property("name", "South"),
        ])
    }

    pub fn run() -> Result<(), Box<dyn Error>> {
        let mut args = std::env::args().skip(1);
        let game = args.next().unwrap_or_else(|| "asteroids".to_string());
        let collection = match args.next() {
            Some(path) => FeatureCollection::from_geojson(&std::fs::read_to_string(path)?)?,
            None => demo_features(),
        };
        log::info!("Loaded {} features", collection.len());

        let bindings = KeyBindings::default();
        let mut session: Box<dyn Session> = match game.as_str() {
            "asteroids" => Box::new(AsteroidsGame::new(&collection, Settings::default(), &bindings, None)),
            "snake" => Box::new(SnakeGame::new(&collection, Settings::default(), &bindings, None)),
            other => return Err(format!("unknown game `{other}` (expected asteroids or snake)").into()),
        };

        // press start, then let the round play out
        let start = bindings.code(Action::Start).ok_or("start is unbound")?;
        let frame_ms = 1000.0 / 60.0;
        session.frame(0.0);
        session.key_down(start);
        session.frame(frame_ms);
        session.key_up(start);
        let mut rendered = 0;
        for i in 2..PLAY_SECONDS * 60 {
            if session.frame(i as f64 * frame_ms) {
                rendered += 1;
            }
        }
        log::info!("Played {rendered} frames");

        println!("{}", session.to_svg());
        Ok(())
    }
}
