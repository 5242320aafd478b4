//! Audio output via cpal
//!
//! A decode thread pushes PCM into a [`SampleQueue`]; the cpal callback pops
//! from it, remixing channels when the device layout differs from the file.

use std::collections::VecDeque;
use std::sync::atomic::{ AtomicBool, Ordering };
use std::sync::{ Arc, Mutex, MutexGuard, PoisonError };

use cpal::traits::{ DeviceTrait, HostTrait, StreamTrait };
use thiserror::Error;


/// Errors that can occur with audio output.
#[derive( Debug, Error )]
pub enum OutputError {
    #[error( "No output device available" )]
    NoDevice,

    #[error( "Failed to get stream config: {0}" )]
    StreamConfig( String ),

    #[error( "Failed to build output stream: {0}" )]
    BuildStream( String ),

    #[error( "Failed to play stream: {0}" )]
    PlayStream( String ),
}


/// Bounded sample FIFO shared between the decode thread and the device
/// callback.
pub struct SampleQueue {
    buffer: Mutex<VecDeque<f32>>,
    capacity: usize,
    paused: AtomicBool,
    source_channels: usize,
    output_channels: usize,
}


impl SampleQueue {
    pub fn new( capacity: usize, source_channels: usize, output_channels: usize ) -> Self {
        Self {
            buffer: Mutex::new( VecDeque::with_capacity( capacity ) ),
            capacity,
            paused: AtomicBool::new( false ),
            source_channels: source_channels.max( 1 ),
            output_channels: output_channels.max( 1 ),
        }
    }


    fn lock( &self ) -> MutexGuard<'_, VecDeque<f32>> {
        self.buffer.lock().unwrap_or_else( PoisonError::into_inner )
    }


    /// Queues as many samples as fit. Returns how many were taken.
    pub fn push( &self, samples: &[f32] ) -> usize {
        let mut buf = self.lock();
        let to_push = samples.len().min( self.capacity.saturating_sub( buf.len() ) );
        buf.extend( samples[ ..to_push ].iter().copied() );
        to_push
    }


    /// Fills `output` (device layout) from the queue, padding with silence.
    /// Returns the number of samples written from the queue.
    pub fn pop( &self, output: &mut [f32] ) -> usize {
        if self.paused.load( Ordering::Relaxed ) {
            output.fill( 0.0 );
            return 0;
        }

        let mut buf = self.lock();
        let src_ch = self.source_channels;
        let out_ch = self.output_channels;
        let frames = ( output.len() / out_ch ).min( buf.len() / src_ch );

        for frame in 0..frames {
            let source: Vec<f32> = buf.drain( ..src_ch ).collect();
            let dest = &mut output[ frame * out_ch..( frame + 1 ) * out_ch ];
            remix( &source, dest );
        }

        let written = frames * out_ch;
        output[ written.. ].fill( 0.0 );
        written
    }


    pub fn len( &self ) -> usize {
        self.lock().len()
    }


    pub fn is_empty( &self ) -> bool {
        self.lock().is_empty()
    }


    pub fn clear( &self ) {
        self.lock().clear();
    }


    pub fn set_paused( &self, paused: bool ) {
        self.paused.store( paused, Ordering::Relaxed );
    }


    pub fn is_paused( &self ) -> bool {
        self.paused.load( Ordering::Relaxed )
    }
}


/// Maps one source frame onto one device frame.
fn remix( source: &[f32], dest: &mut [f32] ) {
    match ( source.len(), dest.len() ) {
        ( s, d ) if s == d => dest.copy_from_slice( source ),
        ( 2, 1 ) => dest[ 0 ] = ( source[ 0 ] + source[ 1 ] ) * 0.5,
        ( s, _ ) => {
            // Extra device channels repeat the last source channel.
            for ( ch, sample ) in dest.iter_mut().enumerate() {
                *sample = source[ ch.min( s - 1 ) ];
            }
        }
    }
}


/// Open cpal output stream.
///
/// Not Send/Sync because of `cpal::Stream`; see `player::OutputHandle`.
pub struct AudioOutput {
    stream: cpal::Stream,
    sample_rate: u32,
}


impl AudioOutput {
    /// Opens the default device, preferring a config that matches the
    /// source. Returns the output and the queue to feed it.
    pub fn new( source_sample_rate: u32, source_channels: u16 ) -> Result<( Self, Arc<SampleQueue> ), OutputError> {
        let device = cpal::default_host()
            .default_output_device()
            .ok_or( OutputError::NoDevice )?;

        tracing::info!( "Using output device: {:?}", device.name() );

        let supported: Vec<_> = device
            .supported_output_configs()
            .map_err( |e| OutputError::StreamConfig( e.to_string() ) )?
            .collect();

        let rate_fits = |c: &cpal::SupportedStreamConfigRange| {
            c.min_sample_rate().0 <= source_sample_rate && c.max_sample_rate().0 >= source_sample_rate
        };

        let config = match supported.iter()
            .find( |c| c.channels() == source_channels && rate_fits( *c ) )
            .or_else( || supported.iter().find( |c| rate_fits( *c ) ) )
        {
            Some( range ) => range.clone().with_sample_rate( cpal::SampleRate( source_sample_rate ) ).config(),
            None => {
                // Device cannot run at the file's rate; the player resamples.
                device
                    .default_output_config()
                    .map_err( |e| OutputError::StreamConfig( e.to_string() ) )?
                    .config()
            }
        };

        tracing::info!( "Audio output config: {} Hz, {} channels", config.sample_rate.0, config.channels );

        // About half a second of source audio.
        let capacity = ( source_sample_rate as usize * source_channels as usize ) / 2;
        let queue = Arc::new( SampleQueue::new( capacity, source_channels as usize, config.channels as usize ) );
        let callback_queue = Arc::clone( &queue );

        let stream = device
            .build_output_stream(
                &config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    callback_queue.pop( data );
                },
                |err| tracing::error!( "Audio output error: {}", err ),
                None,
            )
            .map_err( |e| OutputError::BuildStream( e.to_string() ) )?;

        Ok(( Self { stream, sample_rate: config.sample_rate.0 }, queue ))
    }


    pub fn play( &self ) -> Result<(), OutputError> {
        self.stream.play().map_err( |e| OutputError::PlayStream( e.to_string() ) )
    }


    /// Device sample rate, which may differ from the file's.
    pub fn sample_rate( &self ) -> u32 {
        self.sample_rate
    }
}


#[cfg( test )]
mod tests {
    use super::*;


    #[test]
    fn test_push_respects_capacity() {
        let queue = SampleQueue::new( 4, 2, 2 );
        assert_eq!( queue.push( &[ 0.1, 0.2, 0.3 ] ), 3 );
        assert_eq!( queue.push( &[ 0.4, 0.5, 0.6 ] ), 1 );
        assert_eq!( queue.len(), 4 );
    }


    #[test]
    fn test_pop_same_layout_pads_with_silence() {
        let queue = SampleQueue::new( 16, 2, 2 );
        queue.push( &[ 0.1, 0.2, 0.3, 0.4 ] );
        let mut out = [ 9.0; 6 ];
        assert_eq!( queue.pop( &mut out ), 4 );
        assert_eq!( out, [ 0.1, 0.2, 0.3, 0.4, 0.0, 0.0 ] );
        assert!( queue.is_empty() );
    }


    #[test]
    fn test_pop_mono_to_stereo() {
        let queue = SampleQueue::new( 16, 1, 2 );
        queue.push( &[ 0.5, -0.5 ] );
        let mut out = [ 0.0; 4 ];
        queue.pop( &mut out );
        assert_eq!( out, [ 0.5, 0.5, -0.5, -0.5 ] );
    }


    #[test]
    fn test_pop_stereo_to_mono() {
        let queue = SampleQueue::new( 16, 2, 1 );
        queue.push( &[ 1.0, 0.0, 0.5, 0.5 ] );
        let mut out = [ 0.0; 2 ];
        queue.pop( &mut out );
        assert_eq!( out, [ 0.5, 0.5 ] );
    }


    #[test]
    fn test_paused_queue_outputs_silence_and_keeps_samples() {
        let queue = SampleQueue::new( 16, 1, 1 );
        queue.push( &[ 0.7, 0.8 ] );
        queue.set_paused( true );
        let mut out = [ 1.0; 2 ];
        assert_eq!( queue.pop( &mut out ), 0 );
        assert_eq!( out, [ 0.0, 0.0 ] );
        assert_eq!( queue.len(), 2 );
    }
}
