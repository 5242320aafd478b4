//! termtune CLI - terminal playlist player

mod cli;
mod dashboard;
mod logging;
mod picker;
mod settings;
mod terminal;

use std::io;
use std::process::ExitCode;
use std::thread;

use anyhow::{ Context, Result };
use clap::Parser;

use cli::Args;
use dashboard::Dashboard;
use settings::Settings;
use terminal::TerminalGuard;

use termtune_core::{
    library,
    runner::{ run_command_loop, run_render_loop },
    AudioEngine, Session,
};


fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err( e ) => {
            tracing::error!( "Exiting: {:#}", e );
            for line in picker::message_box( &format!( "{:#}", e ) ) {
                eprintln!( "{}", line );
            }
            ExitCode::FAILURE
        }
    }
}


/// Loads settings, writing the defaults out on first run so they can be edited.
fn load_settings( args: &Args ) -> Settings {
    let mut settings = Settings::load();

    if let Some( path ) = Settings::settings_path() {
        if !path.exists() {
            if let Err( e ) = settings.save_to( &path ) {
                tracing::warn!( "Failed to write default settings: {}", e );
            }
        }
    }

    if let Some( ms ) = args.tick_ms {
        settings.tick_interval_ms = ms;
    }
    if args.no_next {
        settings.show_next_track = false;
    }
    settings
}


fn run() -> Result<()> {
    let args = Args::parse();

    if let Some( path ) = logging::log_path() {
        logging::init( &path );
    }
    tracing::info!( "termtune {} starting", env!( "CARGO_PKG_VERSION" ) );

    let settings = load_settings( &args );

    let folder = match args.folder {
        Some( ref folder ) => folder.clone(),
        None => {
            println!( "Usage: termtune <path_to_music_folder>" );
            println!( "Falling back to the default '{}' directory.", settings.default_folder.display() );
            settings.default_folder.clone()
        }
    };

    let tracks = library::scan( &folder ).context( "Nothing to play" )?;
    for line in picker::song_list_lines( &tracks ) {
        println!( "{}", line );
    }

    let start = match args.track {
        Some( ref number ) => picker::parse_selection( number, tracks.len() )?,
        None => picker::prompt_for_track( &mut io::stdin().lock(), &mut io::stdout(), tracks.len() )?,
    };

    let session = Session::start( tracks, AudioEngine::new(), settings.to_session_config(), start )?;
    tracing::info!( "Session started on {}", session.current_track().display_name );
    let dashboard = Dashboard::new( settings.seek_step_secs, settings.progress_width );
    let mut guard = TerminalGuard::enter().context( "Failed to set up the terminal" )?;

    let result = thread::scope( |scope| {
        let commands = scope.spawn( || {
            let mut keys = terminal::read_key;
            run_command_loop( &session, &mut keys )
        });

        let rendered = run_render_loop( &session, settings.tick_interval(), |snapshot| {
            guard.terminal().draw( |frame| dashboard.draw( frame, snapshot ) ).map( |_| () )
        });

        let commands = commands
            .join()
            .unwrap_or_else( |_| Err( io::Error::other( "command thread panicked" ) ) );
        rendered.and( commands )
    });

    drop( guard );
    result.context( "Terminal I/O failed" )?;

    tracing::info!( "termtune exiting" );
    Ok(())
}
