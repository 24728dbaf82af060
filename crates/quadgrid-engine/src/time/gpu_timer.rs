use std::fmt;
use std::sync::mpsc;
use std::time::Instant;

/// Two timestamps: beginning and end of the timed pass.
const TIMESTAMP_COUNT: u32 = 2;
const TIMESTAMP_BYTES: u64 = TIMESTAMP_COUNT as u64 * std::mem::size_of::<u64>() as u64;

/// Failure to obtain a frame's elapsed time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerError {
    /// The timer has not been started for this frame.
    NotStarted,
    /// The query result could not be read back after the GPU finished.
    Unavailable,
    /// Waiting for the GPU failed.
    Poll(String),
}

impl fmt::Display for TimerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotStarted => write!(f, "frame timer read before it was started"),
            Self::Unavailable => write!(f, "GPU timer query result is not available"),
            Self::Poll(msg) => write!(f, "failed waiting for the GPU: {msg}"),
        }
    }
}

impl std::error::Error for TimerError {}

/// Measures the GPU execution time of one render pass per frame.
///
/// Usage per frame:
/// 1. [`begin`](Self::begin) before recording the pass,
/// 2. pass [`timestamp_writes`](Self::timestamp_writes) to the pass descriptor,
/// 3. [`resolve`](Self::resolve) on the same encoder after the pass ends,
/// 4. submit, then [`read`](Self::read), which blocks until the GPU is idle.
///
/// Uses pass timestamp queries when the device has `TIMESTAMP_QUERY`, and
/// wall-clock time from recording to completion otherwise.
pub struct GpuTimer {
    source: Source,
}

enum Source {
    Timestamps {
        query_set: wgpu::QuerySet,
        resolve_buf: wgpu::Buffer,
        readback_buf: wgpu::Buffer,
        /// Nanoseconds per timestamp tick.
        period: f32,
    },
    WallClock {
        started: Option<Instant>,
    },
}

impl GpuTimer {
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue) -> Self {
        if !device.features().contains(wgpu::Features::TIMESTAMP_QUERY) {
            log::warn!("device lacks TIMESTAMP_QUERY; frame times are wall-clock measurements");
            return Self {
                source: Source::WallClock { started: None },
            };
        }

        let query_set = device.create_query_set(&wgpu::QuerySetDescriptor {
            label: Some("quadgrid timer queries"),
            ty: wgpu::QueryType::Timestamp,
            count: TIMESTAMP_COUNT,
        });

        let resolve_buf = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("quadgrid timer resolve"),
            size: TIMESTAMP_BYTES,
            usage: wgpu::BufferUsages::QUERY_RESOLVE | wgpu::BufferUsages::COPY_SRC,
            mapped_at_creation: false,
        });

        let readback_buf = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("quadgrid timer readback"),
            size: TIMESTAMP_BYTES,
            usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Self {
            source: Source::Timestamps {
                query_set,
                resolve_buf,
                readback_buf,
                period: queue.get_timestamp_period(),
            },
        }
    }

    /// Returns `true` when frame times come from GPU timestamps.
    pub fn uses_timestamps(&self) -> bool {
        matches!(self.source, Source::Timestamps { .. })
    }

    /// Marks the start of a frame measurement.
    pub fn begin(&mut self) {
        if let Source::WallClock { started } = &mut self.source {
            *started = Some(Instant::now());
        }
    }

    /// Timestamp writes for the timed pass, if timestamps are in use.
    pub fn timestamp_writes(&self) -> Option<wgpu::RenderPassTimestampWrites<'_>> {
        match &self.source {
            Source::Timestamps { query_set, .. } => Some(wgpu::RenderPassTimestampWrites {
                query_set,
                beginning_of_pass_write_index: Some(0),
                end_of_pass_write_index: Some(1),
            }),
            Source::WallClock { .. } => None,
        }
    }

    /// Records the query resolve and readback copy. Call after the timed pass.
    pub fn resolve(&self, encoder: &mut wgpu::CommandEncoder) {
        if let Source::Timestamps {
            query_set,
            resolve_buf,
            readback_buf,
            ..
        } = &self.source
        {
            encoder.resolve_query_set(query_set, 0..TIMESTAMP_COUNT, resolve_buf, 0);
            encoder.copy_buffer_to_buffer(resolve_buf, 0, readback_buf, 0, TIMESTAMP_BYTES);
        }
    }

    /// Blocks until the GPU has finished all submitted work and returns the
    /// elapsed time of the timed pass in nanoseconds.
    pub fn read(&mut self, device: &wgpu::Device) -> Result<u64, TimerError> {
        match &mut self.source {
            Source::WallClock { started } => {
                let started = started.take().ok_or(TimerError::NotStarted)?;
                wait_idle(device)?;
                Ok(u64::try_from(started.elapsed().as_nanos()).unwrap_or(u64::MAX))
            }
            Source::Timestamps {
                readback_buf,
                period,
                ..
            } => {
                let slice = readback_buf.slice(..);
                let (sender, receiver) = mpsc::channel();
                slice.map_async(wgpu::MapMode::Read, move |result| {
                    let _ = sender.send(result);
                });

                wait_idle(device)?;

                match receiver.try_recv() {
                    Ok(Ok(())) => {}
                    _ => return Err(TimerError::Unavailable),
                }

                let ticks = {
                    let data = slice.get_mapped_range();
                    let begin: u64 = bytemuck::pod_read_unaligned(&data[0..8]);
                    let end: u64 = bytemuck::pod_read_unaligned(&data[8..16]);
                    end.saturating_sub(begin)
                };
                readback_buf.unmap();

                Ok(ticks_to_ns(ticks, *period))
            }
        }
    }
}

fn wait_idle(device: &wgpu::Device) -> Result<(), TimerError> {
    device
        .poll(wgpu::PollType::Wait {
            submission_index: None,
            timeout: None,
        })
        .map(|_| ())
        .map_err(|e| TimerError::Poll(e.to_string()))
}

fn ticks_to_ns(ticks: u64, period: f32) -> u64 {
    (ticks as f64 * f64::from(period)).round() as u64
}
