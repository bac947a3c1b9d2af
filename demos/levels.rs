use hexglobe::Planet;

fn main() {
    env_logger::init();
    for rounds in 0..6 {
        let planet = Planet::new(rounds).expect("Cannot build planet");
        let pentagons = planet.tiles().iter().filter(|t| t.sides() == 5).count();
        let hexagons = planet.num_tiles() - pentagons;
        println!(
            "level {}: {} tiles ({} pentagons, {} hexagons), {} buffer vertices",
            rounds,
            planet.num_tiles(),
            pentagons,
            hexagons,
            planet.buffers().num_vertices()
        );
    }
}
