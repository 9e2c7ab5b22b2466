//! Terminal hangman on top of the Gabarita client core.
//!
//! Type letters and press enter. `new` starts another word, `quit` (or
//! end of input) leaves.

use clap::Parser;
use gabarita::games::{HangmanEvent, HangmanSnapshot};
use gabarita::prelude::*;
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Parser, Debug)]
#[command(name = "hangman")]
#[command(version, about, long_about = None)]
struct Args {
    /// Seed for word choice; the same seed gives the same words
    #[arg(short, long)]
    seed: Option<u64>,

    /// Comma-separated words to play instead of the built-in bank
    #[arg(short, long, value_delimiter = ',')]
    words: Option<Vec<String>>,

    /// Tracing directive used when RUST_LOG is unset
    #[arg(long, value_name = "DIRECTIVE")]
    log: Option<String>,
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

fn render(snapshot: &HangmanSnapshot) {
    let spaced: Vec<String> = snapshot.masked.chars().map(String::from).collect();
    let guessed: String = snapshot.guessed.iter().collect();
    println!(
        "{}   misses {}/{}   guessed [{}]   {}s",
        spaced.join(" "),
        snapshot.wrong_guesses,
        snapshot.max_wrong_guesses,
        guessed,
        snapshot.elapsed_secs,
    );
}

fn announce(event: &HangmanEvent) {
    match event {
        HangmanEvent::Revealed { letter, positions } => {
            println!("{letter} appears {} time(s)", positions.len());
        }
        HangmanEvent::Missed { letter, .. } => println!("no {letter}"),
        HangmanEvent::Won { score } => println!("solved! score {score}"),
        HangmanEvent::Lost { word } => println!("out of guesses, the word was {word}"),
    }
}

// ---------------------------------------------------------------------------
// Main loop
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = AppConfig::from_env()?;
    if let Some(seed) = args.seed {
        config.game_seed = Some(seed);
    }
    if let Some(log) = args.log {
        config.log = log;
    }
    init_tracing(&config.log);

    let app = App::init(config).await?;
    let game = match args.words {
        Some(words) => Hangman::with_words(words)?,
        None => Hangman::new(),
    };
    let hangman = app.spawn_game(game, None)?;
    tracing::debug!("hangman ready");

    render(&hangman.snapshot().await?);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        match line.trim() {
            "" => continue,
            "quit" => break,
            "new" => {
                render(&hangman.reset().await?);
                continue;
            }
            guesses => {
                for letter in guesses.chars().filter(|c| !c.is_whitespace()) {
                    match hangman.act(HangmanAction::Guess(letter)).await {
                        Ok(events) => events.iter().for_each(announce),
                        Err(GameError::GameOver) => break,
                        Err(e) => println!("{e}"),
                    }
                }
            }
        }

        let snapshot = hangman.snapshot().await?;
        render(&snapshot);
        if snapshot.status.is_terminal() {
            println!("type `new` for another word or `quit` to leave");
        }
    }

    app.shutdown().await;
    Ok(())
}
