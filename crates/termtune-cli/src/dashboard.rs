//! Dashboard drawing
//!
//! Turns one `Snapshot` into the boxed now-playing panel. Row text is built by
//! plain functions so the layout can be checked without a terminal.

use ratatui::{
    layout::Alignment,
    prelude::*,
    widgets::{ Block, BorderType, Borders, Paragraph },
};

use termtune_core::{ Snapshot, StatusLabel };


/// Outer width of the panel, borders included.
const PANEL_WIDTH: u16 = 42;

/// Width of one legend column.
const LEGEND_COLUMN: usize = 20;

const HEADER_ART: [&str; 4] = [
    "♪ termtune ♪",
    " /\\_/\\ ",
    "( o.o )",
    " > ^ < ",
];


/// Fixed parts of the dashboard, built once per session.
pub struct Dashboard {
    legend: Vec<String>,
    progress_width: usize,
}


impl Dashboard {
    pub fn new( seek_step_secs: u64, progress_width: usize ) -> Self {
        Self {
            legend: legend_rows( &termtune_core::command::legend( seek_step_secs ) ),
            progress_width,
        }
    }


    pub fn draw( &self, frame: &mut Frame, snapshot: &Snapshot ) {
        let area = frame.area();
        let width = PANEL_WIDTH.min( area.width );
        let area = Rect { width, ..area };

        let info = info_rows( snapshot );
        let chunks = Layout::default()
            .direction( Direction::Vertical )
            .constraints([
                Constraint::Length( HEADER_ART.len() as u16 + 2 ),
                Constraint::Length( info.len() as u16 + 3 ),
                Constraint::Length( self.legend.len() as u16 + 2 ),
                Constraint::Length( 3 ),
                Constraint::Min( 0 ),
            ])
            .split( area );

        draw_header( frame, chunks[0] );
        draw_now_playing( frame, snapshot, &info, chunks[1] );
        self.draw_controls( frame, chunks[2] );

        let bar = Paragraph::new( snapshot.progress_bar( self.progress_width ) )
            .alignment( Alignment::Center )
            .block( panel().title( " ʕ •ᴥ•ʔ " ).title_alignment( Alignment::Center ) );
        frame.render_widget( bar, chunks[3] );
    }


    fn draw_controls( &self, frame: &mut Frame, area: Rect ) {
        let lines: Vec<Line> = self.legend.iter().map( |row| Line::from( format!( " {}", row ) ) ).collect();
        let controls = Paragraph::new( lines )
            .style( Style::default().fg( Color::DarkGray ) )
            .block( panel().title( " Controls " ) );
        frame.render_widget( controls, area );
    }
}


fn panel() -> Block<'static> {
    Block::default().borders( Borders::ALL ).border_type( BorderType::Double )
}


fn draw_header( frame: &mut Frame, area: Rect ) {
    let lines: Vec<Line> = HEADER_ART.iter().map( |l| Line::from( *l ) ).collect();
    let header = Paragraph::new( lines )
        .alignment( Alignment::Center )
        .style( Style::default().fg( Color::Cyan ).bold() )
        .block( panel() );
    frame.render_widget( header, area );
}


fn draw_now_playing( frame: &mut Frame, snapshot: &Snapshot, info: &[String], area: Rect ) {
    let status_style = match snapshot.status {
        StatusLabel::Playing => Style::default().fg( Color::Green ),
        StatusLabel::Paused => Style::default().fg( Color::Yellow ),
        StatusLabel::Stopped => Style::default().fg( Color::Red ),
    };

    let mut lines: Vec<Line> = info
        .iter()
        .enumerate()
        .map( |( i, row )| {
            // Row 1 is the status line.
            if i == 1 {
                Line::from( Span::styled( format!( " {}", row ), status_style ) )
            } else {
                Line::from( format!( " {}", row ) )
            }
        })
        .collect();

    lines.push( match snapshot.notice {
        Some( ref notice ) => Line::from( Span::styled( format!( " {}", notice ), Style::default().fg( Color::Yellow ) ) ),
        None => Line::from( "" ),
    });

    let title = format!( " Now Playing {}/{} ", snapshot.index + 1, snapshot.track_count );
    let now_playing = Paragraph::new( lines ).block( panel().title( title ) );
    frame.render_widget( now_playing, area );
}


/// Label/value rows of the now-playing panel.
pub fn info_rows( snapshot: &Snapshot ) -> Vec<String> {
    let mut rows = vec![
        format!( "Now Playing: {}", snapshot.title ),
        format!( "Status     : {}", snapshot.status ),
        format!( "Mode       : {}", snapshot.mode ),
        format!( "Time       : {}", snapshot.time_label() ),
    ];
    if let Some( ref next ) = snapshot.next_track {
        rows.push( format!( "Next Song  : {}", next ) );
    }
    rows
}


/// Lays legend entries out two per row.
pub fn legend_rows( entries: &[String] ) -> Vec<String> {
    entries
        .chunks( 2 )
        .map( |pair| match pair {
            [ left, right ] => format!( "{:<width$}{}", left, right, width = LEGEND_COLUMN ),
            [ only ] => only.clone(),
            _ => String::new(),
        })
        .collect()
}


#[cfg( test )]
mod tests {
    use super::*;
    use std::time::Duration;
    use termtune_core::PlaybackMode;


    fn snapshot( next: Option<&str> ) -> Snapshot {
        Snapshot {
            title: "b.mp3".into(),
            status: StatusLabel::Paused,
            mode: PlaybackMode::Normal,
            elapsed: Duration::from_secs( 65 ),
            total: Duration::from_secs( 200 ),
            next_track: next.map( String::from ),
            notice: None,
            index: 1,
            track_count: 3,
        }
    }


    #[test]
    fn test_info_rows() {
        let rows = info_rows( &snapshot( Some( "c.mp3" ) ) );
        assert_eq!( rows, vec![
            "Now Playing: b.mp3",
            "Status     : Paused",
            "Mode       : Normal",
            "Time       : 1:05 / 3:20",
            "Next Song  : c.mp3",
        ]);
    }


    #[test]
    fn test_next_song_row_is_optional() {
        let rows = info_rows( &snapshot( None ) );
        assert_eq!( rows.len(), 4 );
        assert!( rows.iter().all( |r| !r.starts_with( "Next Song" ) ) );
    }


    #[test]
    fn test_legend_rows_pair_up() {
        let rows = legend_rows( &termtune_core::command::legend( 10 ) );
        assert_eq!( rows.len(), 4 );
        assert_eq!( rows[ 0 ], "[P] Play/Pause      [N] Next Track" );
        assert_eq!( rows[ 1 ], "[S] Stop            [B] Previous Track" );
        assert_eq!( rows[ 3 ], "[R] Backward (-10s)" );
    }
}
