//! Terminal renderer.
//!
//! Each cell is four characters wide. Land is drawn as `::`, water as `~~`.
//! An occupied cell shows the gene of its first creature: coloured by gene
//! while alive, in the dead colour once drowned.

use shore_core::{Position, Result};
use shore_world::{Renderer, Snapshot};
use std::collections::BTreeMap;
use std::io::{self, IsTerminal, Write};

/// 24-bit colour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

const DEAD: Rgb = Rgb(0, 255, 255);

/// Gaussian falloff per channel, centred at `max_gene` (red),
/// `max_gene / 2` (green) and `0` (blue)
pub fn gene_color(gene: i32, max_gene: i32) -> Rgb {
    let sigma = (max_gene as f64 / 4.0).max(1.0);
    let channel = |centre: f64| {
        let d = gene as f64 - centre;
        (255.0 * (-(d * d) / (2.0 * sigma * sigma)).exp()).round() as u8
    };
    Rgb(
        channel(max_gene as f64),
        channel(max_gene as f64 / 2.0),
        channel(0.0),
    )
}

#[derive(Debug, Clone, Copy)]
enum Occupant {
    Alive(i32),
    Drowned(i32),
}

pub struct TerminalRenderer<W> {
    out: W,
    ansi: bool,
}

impl TerminalRenderer<io::Stdout> {
    /// Render to stdout, with colours only when stdout is a terminal and
    /// `NO_COLOR` is unset
    pub fn stdout() -> Self {
        let out = io::stdout();
        let ansi = out.is_terminal() && std::env::var_os("NO_COLOR").is_none();
        Self::new(out, ansi)
    }
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W, ansi: bool) -> Self {
        Self { out, ansi }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Compose one frame
    pub fn frame(&self, view: &Snapshot<'_>) -> Result<String> {
        let mut occupants: BTreeMap<Position, Occupant> = BTreeMap::new();
        if let Some(land) = view.current_land() {
            land.try_for_each_nth(0, |pos, creature| {
                occupants.insert(*pos, Occupant::Alive(creature.gene()));
            })?;
        }
        if let Some(water) = view.current_water() {
            water.try_for_each_nth(0, |pos, creature| {
                occupants.insert(*pos, Occupant::Drowned(creature.gene()));
            })?;
        }

        let mut frame = String::new();
        if self.ansi {
            frame.push_str("\x1b[2J\x1b[H");
        }
        frame.push_str(&format!("tick {} ({:?})\n", view.tick, view.phase));

        let side = view.grid.side();
        for y in 0..side {
            for x in 0..side {
                let pos = Position::new(x, y);
                let cell = match occupants.get(&pos) {
                    Some(Occupant::Alive(gene)) => {
                        self.paint(&format!("{:>3} ", gene), gene_color(*gene, view.max_gene))
                    }
                    Some(Occupant::Drowned(gene)) => self.paint(&format!("{:>3} ", gene), DEAD),
                    None if view.is_land(pos) => " :: ".to_string(),
                    None => " ~~ ".to_string(),
                };
                frame.push_str(&cell);
            }
            frame.push('\n');
        }

        frame.push_str(&format!("Creatures: {}\n", view.population()));
        Ok(frame)
    }

    fn paint(&self, text: &str, color: Rgb) -> String {
        if self.ansi {
            format!("\x1b[38;2;{};{};{}m{}\x1b[0m", color.0, color.1, color.2, text)
        } else {
            text.to_string()
        }
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn render(&mut self, view: &Snapshot<'_>) -> Result<()> {
        let frame = self.frame(view)?;
        self.out.write_all(frame.as_bytes())?;
        self.out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shore_core::SimConfig;
    use shore_world::{Creature, Grid, RngSource, Simulation};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_gene_color_peaks() {
        assert_eq!(gene_color(100, 100).0, 255);
        assert_eq!(gene_color(50, 100).1, 255);
        assert_eq!(gene_color(0, 100).2, 255);

        let low = gene_color(0, 100);
        assert!(low.0 < 10);
        let high = gene_color(100, 100);
        assert!(high.2 < 10);
    }

    #[test]
    fn test_frame_shows_grid_and_creatures() {
        let mut config = SimConfig::default();
        config.world.side = 3;
        let grid = Grid::from_rows(&["#~~", "~#~", "~~~"]).unwrap();
        let rng = RngSource::new(ChaCha8Rng::seed_from_u64(0));
        let creatures = [
            Creature::new(42, Position::new(1, 1)),
            Creature::new(7, Position::new(1, 1)),
        ];
        let sim = Simulation::with_population(config, grid, rng, creatures).unwrap();

        let renderer = TerminalRenderer::new(Vec::new(), false);
        let frame = renderer.frame(&sim.snapshot()).unwrap();

        let lines: Vec<&str> = frame.lines().collect();
        assert_eq!(lines[0], "tick 0 (Idle)");
        assert_eq!(lines[1], " ::  ~~  ~~ ");
        assert_eq!(lines[2], " ~~  42  ~~ ");
        assert_eq!(lines[3], " ~~  ~~  ~~ ");
        assert_eq!(lines[4], "Creatures: 2");
    }

    #[test]
    fn test_render_writes_frame() {
        let mut config = SimConfig::default();
        config.world.side = 2;
        let grid = Grid::from_rows(&["##", "##"]).unwrap();
        let rng = RngSource::new(ChaCha8Rng::seed_from_u64(0));
        let sim = Simulation::with_parts(config, grid, rng).unwrap();

        let mut renderer = TerminalRenderer::new(Vec::new(), true);
        renderer.render(&sim.snapshot()).unwrap();
        let written = String::from_utf8(renderer.into_inner()).unwrap();

        assert!(written.starts_with("\x1b[2J\x1b[H"));
        assert!(written.contains("\x1b[38;2;"));
        assert!(written.ends_with("Creatures: 1\n"));
    }
}
