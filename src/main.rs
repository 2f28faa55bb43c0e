use std::io;

use color_snake::config::{self, UserData};
use color_snake::game::{GameSession, SessionConfig};
use color_snake::playfield::Playfield;
use color_snake::term::TermSurface;

fn main() -> io::Result<()> {
    let mut data = UserData::load();
    let session_config = SessionConfig::from_userdata(&data);

    let mut term = TermSurface::new(session_config.two_player)?;
    let (half_w, half_h) = term.playfield_extents();
    term.setup()?;
    term.show_intro()?;

    let mut session = GameSession::new(session_config, Playfield::new(half_w, half_h), &mut term);
    session.persist_to(config::default_path());
    let outcome = session.run();

    term.restore()?;

    data.speed = outcome.speed;
    data.highscore = outcome.highscore;
    data.save()
}
