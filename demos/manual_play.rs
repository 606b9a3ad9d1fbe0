use std::error::Error;

use log::LevelFilter;
use maze_rl::{
    algo::ManualPlay,
    gym::MazeConfig,
    viz::{self, MazeView},
};

fn main() -> Result<(), Box<dyn Error>> {
    viz::init_logger(LevelFilter::Info);

    let mut game = ManualPlay::new(MazeConfig::default())?;
    let score = {
        let mut view = MazeView::new()?;
        game.run(&mut view)
    };

    println!("Total points: {score}");
    Ok(())
}
