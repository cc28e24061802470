use anyhow::Error as Anyhow;
use clap::Subcommand;
use derive_more::From;

mod carrom;
mod chess;

#[derive(From, Subcommand)]
pub enum Applet {
    Chess(chess::Chess),
    Carrom(carrom::Carrom),
}

impl Default for Applet {
    fn default() -> Self {
        chess::Chess::default().into()
    }
}

impl Applet {
    pub async fn execute(self) -> Result<(), Anyhow> {
        match self {
            Applet::Chess(a) => Ok(a.execute().await?),
            Applet::Carrom(a) => Ok(a.execute().await?),
        }
    }
}
