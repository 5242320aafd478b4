//! Audio decoding via Symphonia
//!
//! Produces interleaved f32 PCM from wav/mp3/ogg files.

use std::fs::File;
use std::path::Path;
use std::time::Duration;

use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{ Decoder as SymphoniaDecoder, DecoderOptions, CODEC_TYPE_NULL };
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::{ FormatOptions, FormatReader, SeekMode, SeekTo };
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use symphonia::core::units::Time;
use thiserror::Error;


/// Errors that can occur during decoding.
#[derive( Debug, Error )]
pub enum DecoderError {
    #[error( "Failed to open file: {0}" )]
    FileOpen( #[from] std::io::Error ),

    #[error( "Unsupported format" )]
    UnsupportedFormat,

    #[error( "No audio tracks found" )]
    NoAudioTrack,

    #[error( "Decoder creation failed: {0}" )]
    DecoderCreation( String ),

    #[error( "Decode error: {0}" )]
    Decode( String ),

    #[error( "Seek error: {0}" )]
    Seek( String ),
}


/// Streaming decoder for one audio file.
pub struct Decoder {
    format_reader: Box<dyn FormatReader>,
    decoder: Box<dyn SymphoniaDecoder>,
    track_id: u32,
    sample_rate: u32,
    channels: usize,
    duration: Duration,
    sample_buf: Option<SampleBuffer<f32>>,
}


impl Decoder {
    /// Probes and opens `path`. Fails without side effects when the file is
    /// missing or not a format Symphonia understands.
    pub fn open( path: &Path ) -> Result<Self, DecoderError> {
        let file = File::open( path )?;
        let mss = MediaSourceStream::new( Box::new( file ), Default::default() );

        let mut hint = Hint::new();
        if let Some( ext ) = path.extension().and_then( |e| e.to_str() ) {
            hint.with_extension( ext );
        }

        let probed = symphonia::default::get_probe()
            .format( &hint, mss, &FormatOptions::default(), &MetadataOptions::default() )
            .map_err( |_| DecoderError::UnsupportedFormat )?;
        let format_reader = probed.format;

        let track = format_reader
            .tracks()
            .iter()
            .find( |t| t.codec_params.codec != CODEC_TYPE_NULL )
            .ok_or( DecoderError::NoAudioTrack )?;

        let track_id = track.id;
        let codec_params = &track.codec_params;
        let sample_rate = codec_params.sample_rate.unwrap_or( 44100 );
        let channels = codec_params.channels.map( |c| c.count() ).unwrap_or( 2 );
        let duration = codec_params.n_frames
            .map( |frames| Duration::from_secs_f64( frames as f64 / sample_rate as f64 ) )
            .unwrap_or( Duration::ZERO );

        let decoder = symphonia::default::get_codecs()
            .make( codec_params, &DecoderOptions::default() )
            .map_err( |e| DecoderError::DecoderCreation( e.to_string() ) )?;

        tracing::debug!(
            "Opened {:?}: {} Hz, {} channels, {:?}",
            path,
            sample_rate,
            channels,
            duration
        );

        Ok( Self {
            format_reader,
            decoder,
            track_id,
            sample_rate,
            channels,
            duration,
            sample_buf: None,
        })
    }


    pub fn sample_rate( &self ) -> u32 {
        self.sample_rate
    }


    pub fn channels( &self ) -> usize {
        self.channels
    }


    /// Track length, zero when the container does not say.
    pub fn duration( &self ) -> Duration {
        self.duration
    }


    /// Decodes the next packet of our track into interleaved samples.
    ///
    /// Returns None at end of stream.
    pub fn decode_next( &mut self ) -> Result<Option<Vec<f32>>, DecoderError> {
        loop {
            let packet = match self.format_reader.next_packet() {
                Ok( packet ) => packet,
                Err( SymphoniaError::IoError( ref e ) ) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                    return Ok( None );
                }
                Err( e ) => return Err( DecoderError::Decode( e.to_string() ) ),
            };

            if packet.track_id() != self.track_id {
                continue;
            }

            let decoded = match self.decoder.decode( &packet ) {
                Ok( decoded ) => decoded,
                // Corrupt packets are skipped, the rest of the stream may be fine.
                Err( SymphoniaError::DecodeError( _ ) ) => continue,
                Err( e ) => return Err( DecoderError::Decode( e.to_string() ) ),
            };

            let frames = decoded.frames();
            let spec = *decoded.spec();
            let buf = match self.sample_buf.take() {
                Some( buf ) if buf.capacity() >= frames => buf,
                _ => SampleBuffer::new( frames as u64, spec ),
            };
            let buf = self.sample_buf.insert( buf );
            buf.copy_interleaved_ref( decoded );

            return Ok( Some( buf.samples().to_vec() ) );
        }
    }


    /// Jumps to `position` from the start of the track.
    pub fn seek( &mut self, position: Duration ) -> Result<(), DecoderError> {
        let seek_to = SeekTo::Time {
            time: Time::from( position.as_secs_f64() ),
            track_id: Some( self.track_id ),
        };

        self.format_reader
            .seek( SeekMode::Accurate, seek_to )
            .map_err( |e| DecoderError::Seek( e.to_string() ) )?;
        self.decoder.reset();

        Ok(())
    }
}
