//! Scrolling title display.

use std::time::{ Duration, Instant };


/// Blank columns shown between the end of the text and its next repetition.
const GAP: usize = 3;

pub const DEFAULT_SCROLL_DELAY: Duration = Duration::from_millis( 200 );


/// Fixed-width view onto a title that scrolls when the title is too long.
#[derive( Debug, Clone )]
pub struct Marquee {
    text: Vec<char>,
    width: usize,
    delay: Duration,
    position: usize,
    last_advance: Instant,
}


impl Marquee {
    pub fn new( text: &str, width: usize, delay: Duration, now: Instant ) -> Self {
        Self {
            text: text.chars().collect(),
            width,
            delay,
            position: 0,
            last_advance: now,
        }
    }


    /// Whether the text is wider than the viewport.
    pub fn is_scrolling( &self ) -> bool {
        self.text.len() > self.width
    }


    /// Current scroll cursor, in characters.
    pub fn position( &self ) -> usize {
        self.position
    }


    /// Renders the viewport at `now`, advancing the cursor by at most one
    /// step once `delay` has passed since the last step.
    pub fn render( &mut self, now: Instant ) -> String {
        if !self.is_scrolling() {
            return self.text.iter().collect();
        }

        let cycle = self.text.len() + GAP;
        if now.saturating_duration_since( self.last_advance ) >= self.delay {
            self.position = ( self.position + 1 ) % cycle;
            self.last_advance = now;
        }

        ( 0..self.width )
            .map( |i| {
                let idx = ( self.position + i ) % cycle;
                self.text.get( idx ).copied().unwrap_or( ' ' )
            })
            .collect()
    }
}


#[cfg( test )]
mod tests {
    use super::*;
    use proptest::prelude::*;


    const DELAY: Duration = Duration::from_millis( 200 );


    #[test]
    fn test_short_text_is_returned_unchanged() {
        let start = Instant::now();
        let mut marquee = Marquee::new( "short.mp3", 26, DELAY, start );
        assert!( !marquee.is_scrolling() );
        assert_eq!( marquee.render( start + DELAY * 10 ), "short.mp3" );
        assert_eq!( marquee.position(), 0 );
    }


    #[test]
    fn test_text_exactly_viewport_width_does_not_scroll() {
        let start = Instant::now();
        let mut marquee = Marquee::new( "abcde", 5, DELAY, start );
        assert_eq!( marquee.render( start + DELAY ), "abcde" );
    }


    #[test]
    fn test_scrolls_one_step_per_delay() {
        let start = Instant::now();
        let mut marquee = Marquee::new( "abcdefgh", 5, DELAY, start );

        assert_eq!( marquee.render( start ), "abcde" );
        assert_eq!( marquee.render( start + DELAY ), "bcdef" );
        assert_eq!( marquee.render( start + DELAY * 2 ), "cdefg" );
        assert_eq!( marquee.render( start + DELAY * 3 ), "defgh" );
        assert_eq!( marquee.render( start + DELAY * 4 ), "efgh " );
        assert_eq!( marquee.render( start + DELAY * 5 ), "fgh  " );
        assert_eq!( marquee.render( start + DELAY * 6 ), "gh   " );
        assert_eq!( marquee.render( start + DELAY * 7 ), "h   a" );
    }


    #[test]
    fn test_calls_within_delay_do_not_advance() {
        let start = Instant::now();
        let mut marquee = Marquee::new( "a fairly long title.mp3", 8, DELAY, start );
        let first = marquee.render( start + Duration::from_millis( 10 ) );
        for ms in [ 50, 100, 150, 199 ] {
            assert_eq!( marquee.render( start + Duration::from_millis( ms ) ), first );
        }
    }


    #[test]
    fn test_multibyte_titles_scroll_by_character() {
        let start = Instant::now();
        let mut marquee = Marquee::new( "ÄÖÜäöü", 3, DELAY, start );
        assert_eq!( marquee.render( start ), "ÄÖÜ" );
        assert_eq!( marquee.render( start + DELAY ), "ÖÜä" );
    }


    proptest! {
        #[test]
        fn prop_output_has_viewport_width_and_period( text in "[a-z]{6,30}", width in 1usize..6 ) {
            let start = Instant::now();
            let mut marquee = Marquee::new( &text, width, DELAY, start );
            let period = text.chars().count() + GAP;

            let frames: Vec<String> = ( 1..=period * 2 )
                .map( |i| marquee.render( start + DELAY * i as u32 ) )
                .collect();

            for frame in &frames {
                prop_assert_eq!( frame.chars().count(), width );
            }
            for i in 0..period {
                prop_assert_eq!( &frames[ i ], &frames[ i + period ] );
            }
            prop_assert_eq!( marquee.position(), 0 );
        }
    }
}
