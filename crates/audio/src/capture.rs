use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, Sample, SampleFormat};
use ringbuf::traits::{Consumer, Producer, Split};
use ringbuf::HeapRb;

use crate::level::{downmix, LevelHistory, LevelMeter};

pub type LevelProducer = ringbuf::HeapProd<f32>;
pub type LevelConsumer = ringbuf::HeapCons<f32>;

/// Levels per second reported by the meter.
const LEVELS_PER_SECOND: u32 = 30;
const QUEUE_LEN: usize = 256;

#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("no default input device")]
    NoDevice,
    #[error("failed to get default input config: {0}")]
    Config(#[from] cpal::DefaultStreamConfigError),
    #[error("unsupported sample format: {0}")]
    UnsupportedFormat(SampleFormat),
    #[error("failed to build input stream: {0}")]
    Build(#[from] cpal::BuildStreamError),
    #[error("failed to start input stream: {0}")]
    Play(#[from] cpal::PlayStreamError),
}

/// Live microphone meter. Dropping it closes the device.
pub struct MicCapture {
    _stream: cpal::Stream,
    consumer: LevelConsumer,
    history: LevelHistory,
}

impl MicCapture {
    /// Opens the default input device, keeping the last `bars` levels.
    pub fn open(bars: usize) -> Result<Self, CaptureError> {
        let host = cpal::default_host();
        let device = host.default_input_device().ok_or(CaptureError::NoDevice)?;
        let supported = device.default_input_config()?;

        let sample_rate_hz = supported.sample_rate().0;
        let sample_format = supported.sample_format();
        let config: cpal::StreamConfig = supported.into();
        let channels = usize::from(config.channels.max(1));
        let window = (sample_rate_hz / LEVELS_PER_SECOND).max(1) as usize;

        let (producer, consumer) = HeapRb::<f32>::new(QUEUE_LEN).split();

        let stream = match sample_format {
            SampleFormat::F32 => build_stream::<f32>(&device, &config, channels, window, producer)?,
            SampleFormat::I16 => build_stream::<i16>(&device, &config, channels, window, producer)?,
            SampleFormat::U16 => build_stream::<u16>(&device, &config, channels, window, producer)?,
            other => return Err(CaptureError::UnsupportedFormat(other)),
        };
        stream.play()?;

        log::info!("microphone open at {sample_rate_hz} Hz, {channels} channel(s)");
        Ok(Self {
            _stream: stream,
            consumer,
            history: LevelHistory::new(bars),
        })
    }

    /// Moves queued levels into the history. Call once per frame.
    pub fn poll(&mut self) -> &LevelHistory {
        while let Some(level) = self.consumer.try_pop() {
            self.history.push(level);
        }
        &self.history
    }
}

fn build_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    channels: usize,
    window: usize,
    mut producer: LevelProducer,
) -> Result<cpal::Stream, CaptureError>
where
    T: Sample + cpal::SizedSample,
    f32: FromSample<T>,
{
    let mut meter = LevelMeter::new(window);
    let mut frame = Vec::with_capacity(channels);
    let stream = device.build_input_stream(
        config,
        move |data: &[T], _| {
            for chunk in data.chunks(channels) {
                frame.clear();
                frame.extend(chunk.iter().map(|&s| f32::from_sample(s)));
                if let Some(level) = meter.push(downmix(&frame)) {
                    // Full queue means nobody is reading; drop the level.
                    let _ = producer.try_push(level);
                }
            }
        },
        |err| log::warn!("microphone stream error: {err}"),
        None,
    )?;
    Ok(stream)
}
