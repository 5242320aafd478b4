//! Audio engine backed by Symphonia, rubato and cpal
//!
//! Implements [`PlaybackEngine`]: a loaded track is decoded on its own thread
//! into a sample queue that the output device drains.

use std::path::PathBuf;
use std::sync::atomic::{ AtomicBool, AtomicU64, Ordering };
use std::sync::{ Arc, PoisonError, RwLock };
use std::thread;
use std::time::Duration;

use rubato::{ FastFixedOut, PolynomialDegree, Resampler };

use crate::decoder::Decoder;
use crate::engine::{ EngineError, EngineStatus, PlaybackEngine };
use crate::output::{ AudioOutput, SampleQueue };


/// Converts planar samples back to interleaved format.
/// [[L0, L1, ...], [R0, R1, ...]] → [L0, R0, L1, R1, ...]
fn interleave( channels: &[Vec<f32>] ) -> Vec<f32> {
    let Some( frames ) = channels.first().map( Vec::len ) else {
        return Vec::new();
    };
    let mut out = Vec::with_capacity( frames * channels.len() );
    for f in 0..frames {
        for ch in channels {
            out.push( ch[ f ] );
        }
    }
    out
}


/// Builds a resampler when the device cannot run at the file's rate.
fn resampler_for( source_rate: u32, device_rate: u32, channels: usize ) -> Result<Option<FastFixedOut<f32>>, EngineError> {
    if source_rate == device_rate {
        return Ok( None );
    }

    tracing::info!( "Resampling: {} Hz → {} Hz", source_rate, device_rate );
    FastFixedOut::<f32>::new(
        device_rate as f64 / source_rate as f64,
        2.0,
        PolynomialDegree::Cubic,
        1024,
        channels,
    )
    .map( Some )
    .map_err( |e| EngineError::Output( format!( "Failed to create resampler: {}", e ) ) )
}


/// Keeps the cpal stream alive for the lifetime of one playback.
///
/// SAFETY: `cpal::Stream` is only created, played and dropped by the engine,
/// and the engine is only reachable through the session mutex, so the stream
/// is never touched from two threads at once. The realtime callback runs on a
/// thread owned by cpal and only sees the shared `SampleQueue`.
#[allow( dead_code )] // Held for its Drop impl, which closes the device stream
struct OutputHandle( AudioOutput );

unsafe impl Send for OutputHandle {}


/// One running decode thread plus its output stream.
struct PlaybackHandle {
    stop_flag: Arc<AtomicBool>,
    queue: Arc<SampleQueue>,
    #[allow( dead_code )] // Kept alive for its Drop impl
    output: OutputHandle,
    thread: Option<thread::JoinHandle<()>>,
    /// Source frames decoded so far, including the seek start point
    frames_played: Arc<AtomicU64>,
    sample_rate: u32,
}


impl PlaybackHandle {
    fn position( &self ) -> Duration {
        let frames = self.frames_played.load( Ordering::Relaxed );
        Duration::from_secs_f64( frames as f64 / self.sample_rate as f64 )
    }


    fn shutdown( mut self ) {
        self.stop_flag.store( true, Ordering::Relaxed );
        self.queue.clear();
        if let Some( thread ) = self.thread.take() {
            let _ = thread.join();
        }
    }
}


/// Everything the decode thread owns.
struct DecodeJob {
    decoder: Decoder,
    queue: Arc<SampleQueue>,
    stop_flag: Arc<AtomicBool>,
    status: Arc<RwLock<EngineStatus>>,
    resampler: Option<FastFixedOut<f32>>,
    frames_played: Arc<AtomicU64>,
}


impl DecodeJob {
    fn stopped( &self ) -> bool {
        self.stop_flag.load( Ordering::Relaxed )
    }


    /// Pushes all of `samples`, waiting for room, unless asked to stop.
    fn push_all( &self, samples: &[f32] ) {
        let mut offset = 0;
        while offset < samples.len() && !self.stopped() {
            let pushed = self.queue.push( &samples[ offset.. ] );
            offset += pushed;
            if pushed == 0 {
                thread::sleep( Duration::from_millis( 5 ) );
            }
        }
    }


    fn run( mut self ) {
        let channels = self.decoder.channels();
        // Keep about 50ms decoded ahead of the device.
        let target_buffer = ( self.decoder.sample_rate() as usize * channels ) / 20;
        let mut planar: Vec<Vec<f32>> = ( 0..channels ).map( |_| Vec::new() ).collect();

        loop {
            if self.stopped() {
                tracing::debug!( "Decode loop: stop signal received" );
                return;
            }

            if self.queue.is_paused() {
                thread::sleep( Duration::from_millis( 10 ) );
                continue;
            }

            if self.queue.len() > target_buffer {
                thread::sleep( Duration::from_millis( 5 ) );
                continue;
            }

            match self.decoder.decode_next() {
                Ok( Some( samples ) ) => {
                    self.frames_played.fetch_add( ( samples.len() / channels ) as u64, Ordering::Relaxed );
                    let out = self.resample( &samples, &mut planar );
                    self.push_all( &out );
                }
                Ok( None ) => {
                    self.flush_resampler( &mut planar );
                    while !self.queue.is_empty() && !self.stopped() {
                        thread::sleep( Duration::from_millis( 10 ) );
                    }
                    tracing::info!( "Decode loop: reached end of file" );
                    break;
                }
                Err( e ) => {
                    tracing::error!( "Decode error: {}", e );
                    break;
                }
            }
        }

        // A finished or broken stream reads as Stopped, unless the engine is
        // already tearing this playback down.
        if !self.stopped() {
            *self.status.write().unwrap_or_else( PoisonError::into_inner ) = EngineStatus::Stopped;
        }
        tracing::debug!( "Decode loop: exiting" );
    }


    fn resample( &mut self, samples: &[f32], planar: &mut [Vec<f32>] ) -> Vec<f32> {
        let Some( resampler ) = self.resampler.as_mut() else {
            return samples.to_vec();
        };

        for frame in samples.chunks( planar.len() ) {
            for ( ch, sample ) in frame.iter().enumerate() {
                planar[ ch ].push( *sample );
            }
        }

        let mut out = Vec::new();
        while planar[ 0 ].len() >= resampler.input_frames_next() {
            let needed = resampler.input_frames_next();
            let chunk: Vec<Vec<f32>> = planar.iter_mut().map( |ch| ch.drain( ..needed ).collect() ).collect();
            match resampler.process( &chunk, None ) {
                Ok( resampled ) => out.extend( interleave( &resampled ) ),
                Err( e ) => {
                    tracing::error!( "Resample error: {}", e );
                    break;
                }
            }
        }
        out
    }


    fn flush_resampler( &mut self, planar: &mut [Vec<f32>] ) {
        let Some( resampler ) = self.resampler.as_mut() else {
            return;
        };
        if planar[ 0 ].is_empty() {
            return;
        }
        match resampler.process_partial( Some( &planar[ .. ] ), None ) {
            Ok( resampled ) => {
                let out = interleave( &resampled );
                self.push_all( &out );
            }
            Err( e ) => tracing::error!( "Final resample error: {}", e ),
        }
    }
}


#[derive( Debug, Clone )]
struct LoadedTrack {
    path: PathBuf,
    duration: Duration,
}


/// Real playback engine for the local audio device.
pub struct AudioEngine {
    loaded: Option<LoadedTrack>,
    playback: Option<PlaybackHandle>,
    status: Arc<RwLock<EngineStatus>>,
}


impl AudioEngine {
    pub fn new() -> Self {
        Self {
            loaded: None,
            playback: None,
            status: Arc::new( RwLock::new( EngineStatus::Stopped ) ),
        }
    }


    fn set_status( &self, status: EngineStatus ) {
        *self.status.write().unwrap_or_else( PoisonError::into_inner ) = status;
    }


    fn teardown( &mut self ) {
        if let Some( handle ) = self.playback.take() {
            handle.shutdown();
        }
    }


    /// Starts a fresh decode thread at `offset`, optionally already paused.
    fn start_at( &mut self, offset: Duration, paused: bool ) -> Result<(), EngineError> {
        let track = self.loaded.as_ref().ok_or( EngineError::NoTrack )?;

        let mut decoder = Decoder::open( &track.path )
            .map_err( |e| EngineError::Open( e.to_string() ) )?;
        if !offset.is_zero() {
            decoder.seek( offset ).map_err( |e| EngineError::Decode( e.to_string() ) )?;
        }

        let sample_rate = decoder.sample_rate();
        let channels = decoder.channels();
        let ( output, queue ) = AudioOutput::new( sample_rate, channels as u16 )
            .map_err( |e| EngineError::Output( e.to_string() ) )?;
        queue.set_paused( paused );
        output.play().map_err( |e| EngineError::Output( e.to_string() ) )?;

        let resampler = resampler_for( sample_rate, output.sample_rate(), channels )?;
        let stop_flag = Arc::new( AtomicBool::new( false ) );
        let start_frames = ( offset.as_secs_f64() * sample_rate as f64 ) as u64;
        let frames_played = Arc::new( AtomicU64::new( start_frames ) );

        let job = DecodeJob {
            decoder,
            queue: Arc::clone( &queue ),
            stop_flag: Arc::clone( &stop_flag ),
            status: Arc::clone( &self.status ),
            resampler,
            frames_played: Arc::clone( &frames_played ),
        };
        let thread = thread::spawn( move || job.run() );

        self.playback = Some( PlaybackHandle {
            stop_flag,
            queue,
            output: OutputHandle( output ),
            thread: Some( thread ),
            frames_played,
            sample_rate,
        });
        Ok(())
    }
}


impl Default for AudioEngine {
    fn default() -> Self {
        Self::new()
    }
}


impl PlaybackEngine for AudioEngine {
    fn open( &mut self, path: &std::path::Path ) -> Result<(), EngineError> {
        // Probe first so a bad file leaves the current playback alone.
        let decoder = Decoder::open( path ).map_err( |e| EngineError::Open( e.to_string() ) )?;

        self.teardown();
        self.loaded = Some( LoadedTrack {
            path: path.to_path_buf(),
            duration: decoder.duration(),
        });
        self.set_status( EngineStatus::Stopped );
        tracing::info!( "Loaded: {:?}", path );
        Ok(())
    }


    fn play( &mut self ) -> Result<(), EngineError> {
        match self.status() {
            EngineStatus::Playing => Ok(()),
            EngineStatus::Paused => {
                if let Some( ref handle ) = self.playback {
                    handle.queue.set_paused( false );
                }
                self.set_status( EngineStatus::Playing );
                Ok(())
            }
            EngineStatus::Stopped => {
                self.teardown();
                self.start_at( Duration::ZERO, false )?;
                self.set_status( EngineStatus::Playing );
                Ok(())
            }
        }
    }


    fn pause( &mut self ) {
        if self.status() != EngineStatus::Playing {
            return;
        }
        if let Some( ref handle ) = self.playback {
            handle.queue.set_paused( true );
            self.set_status( EngineStatus::Paused );
        }
    }


    fn stop( &mut self ) {
        self.teardown();
        self.set_status( EngineStatus::Stopped );
    }


    fn offset( &self ) -> Duration {
        if self.status() == EngineStatus::Stopped {
            return Duration::ZERO;
        }
        self.playback.as_ref().map( PlaybackHandle::position ).unwrap_or( Duration::ZERO )
    }


    fn duration( &self ) -> Duration {
        self.loaded.as_ref().map( |t| t.duration ).unwrap_or( Duration::ZERO )
    }


    /// Restarts decoding at `offset`, keeping the current paused state.
    fn set_offset( &mut self, offset: Duration ) -> Result<(), EngineError> {
        let status = self.status();
        if status == EngineStatus::Stopped {
            return Ok(());
        }

        tracing::info!( "Seeking to {:?}", offset );
        self.teardown();
        let paused = status == EngineStatus::Paused;
        if let Err( e ) = self.start_at( offset, paused ) {
            self.set_status( EngineStatus::Stopped );
            return Err( e );
        }
        self.set_status( status );
        Ok(())
    }


    fn status( &self ) -> EngineStatus {
        *self.status.read().unwrap_or_else( PoisonError::into_inner )
    }
}


impl Drop for AudioEngine {
    fn drop( &mut self ) {
        self.teardown();
    }
}


#[cfg( test )]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;


    /// Writes a mono 16-bit PCM WAV of `secs` seconds at 8 kHz.
    fn write_wav( path: &Path, secs: u32 ) {
        let rate: u32 = 8000;
        let data_len = rate * secs * 2;
        let mut bytes = Vec::new();
        bytes.extend_from_slice( b"RIFF" );
        bytes.extend_from_slice( &( 36 + data_len ).to_le_bytes() );
        bytes.extend_from_slice( b"WAVEfmt " );
        bytes.extend_from_slice( &16u32.to_le_bytes() );
        bytes.extend_from_slice( &1u16.to_le_bytes() );
        bytes.extend_from_slice( &1u16.to_le_bytes() );
        bytes.extend_from_slice( &rate.to_le_bytes() );
        bytes.extend_from_slice( &( rate * 2 ).to_le_bytes() );
        bytes.extend_from_slice( &2u16.to_le_bytes() );
        bytes.extend_from_slice( &16u16.to_le_bytes() );
        bytes.extend_from_slice( b"data" );
        bytes.extend_from_slice( &data_len.to_le_bytes() );
        bytes.resize( bytes.len() + data_len as usize, 0 );
        fs::write( path, bytes ).unwrap();
    }


    #[test]
    fn test_interleave() {
        let planar = vec![ vec![ 1.0, 2.0 ], vec![ 10.0, 20.0 ] ];
        assert_eq!( interleave( &planar ), vec![ 1.0, 10.0, 2.0, 20.0 ] );
        assert!( interleave( &[] ).is_empty() );
    }


    #[test]
    fn test_new_engine_is_stopped_and_empty() {
        let mut engine = AudioEngine::new();
        assert_eq!( engine.status(), EngineStatus::Stopped );
        assert_eq!( engine.offset(), Duration::ZERO );
        assert_eq!( engine.duration(), Duration::ZERO );
        assert!( matches!( engine.play(), Err( EngineError::NoTrack ) ) );
    }


    #[test]
    fn test_open_reads_duration_without_playing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join( "tone.wav" );
        write_wav( &path, 2 );

        let mut engine = AudioEngine::new();
        engine.open( &path ).unwrap();
        assert_eq!( engine.duration(), Duration::from_secs( 2 ) );
        assert_eq!( engine.status(), EngineStatus::Stopped );
        // Seeking a stopped track has no effect.
        engine.set_offset( Duration::from_secs( 1 ) ).unwrap();
        assert_eq!( engine.offset(), Duration::ZERO );
    }


    #[test]
    fn test_failed_open_keeps_previous_track() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join( "good.wav" );
        let bad = dir.path().join( "bad.mp3" );
        write_wav( &good, 1 );
        fs::write( &bad, b"definitely not audio" ).unwrap();

        let mut engine = AudioEngine::new();
        engine.open( &good ).unwrap();
        assert!( matches!( engine.open( &bad ), Err( EngineError::Open( _ ) ) ) );
        assert!( matches!( engine.open( &dir.path().join( "missing.ogg" ) ), Err( EngineError::Open( _ ) ) ) );
        assert_eq!( engine.duration(), Duration::from_secs( 1 ) );
    }
}
