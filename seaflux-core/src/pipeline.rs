//! Flux Processing Pipeline
//!
//! ## Overview
//!
//! [`FluxProcessor`] wires the stages together for every window of a call:
//!
//! ```text
//! MotionInputs ─► WindowPlan ─► condition ─► despike ─► classify compass
//!                                                          │
//!                      FilterBank::select(quality) ◄───────┘
//!                                 │
//!             MotionCorrector ─► rotate_to_earth ─► EdgeChopper ─► Fluxes
//! ```
//!
//! Contract violations (empty or mismatched channels, NaN input, bad
//! configuration) are rejected up front with a
//! [`ContractError`](crate::errors::ContractError). Data faults
//! found while despiking never fail the call: they mark the affected window's
//! [`FluxEstimate`] as missing and processing moves on.
//!
//! ## Windows
//!
//! Windows are independent. With the `parallel` feature they are mapped
//! across the rayon pool; results are always returned in window order.
//!
//! ## Example
//!
//! ```no_run
//! use seaflux_core::{FluxProcessor, MotionInputs, ProcessingConfig};
//!
//! # fn load() -> (Vec<f64>, Vec<Vec<f64>>) { unimplemented!() }
//! let (t, ch) = load();
//! let inputs = MotionInputs {
//!     timestamps: &t,
//!     wind: [&ch[0], &ch[1], &ch[2]],
//!     heading: &ch[3],
//!     rate: [&ch[4], &ch[5], &ch[6]],
//!     accel: [&ch[7], &ch[8], &ch[9]],
//!     latitude: &ch[10],
//! };
//! let processor = FluxProcessor::new(ProcessingConfig::default())?;
//! let out = processor.flux_and_wind(&inputs, &ch[11])?;
//! for fluxes in out.fluxes.iter() {
//!     println!("uw={} vw={} wt={}", fluxes.uw(), fluxes.vw(), fluxes.wt());
//! }
//! # Ok::<(), seaflux_core::ContractError>(())
//! ```

use alloc::vec::Vec;

use crate::{
    channels::{check_channel, Channel, MotionInputs},
    chop::{window_timestamp, EdgeChopper, WindowTimestamp},
    compass::{classify, CompassQuality},
    config::ProcessingConfig,
    despike::{DespikeReport, SpikeRemover},
    errors::{ContractResult, DataFault},
    filters::FilterBank,
    flux::{sonic_temperatures, FluxEstimate, Fluxes},
    motion::{MotionCorrector, MotionWindow},
    rotation::{rotate_to_earth, EarthWind},
    window::{WindowPlan, WindowSpan},
};

/// One value per window.
///
/// A call that produced exactly one window yields `Single`, otherwise the
/// values come as a `Sequence` in window order.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PerWindow<T> {
    /// Exactly one window
    Single(T),
    /// Several windows, in order
    Sequence(Vec<T>),
}

impl<T> PerWindow<T> {
    /// Wrap per-window values
    pub fn from_vec(mut values: Vec<T>) -> Self {
        if values.len() == 1 {
            if let Some(value) = values.pop() {
                return Self::Single(value);
            }
        }
        Self::Sequence(values)
    }

    /// Values as a slice, one per window
    pub fn as_slice(&self) -> &[T] {
        match self {
            Self::Single(value) => core::slice::from_ref(value),
            Self::Sequence(values) => values,
        }
    }

    /// Number of windows
    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    /// True when no window was produced
    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }

    /// Iterate in window order
    pub fn iter(&self) -> core::slice::Iter<'_, T> {
        self.as_slice().iter()
    }

    /// Unwrap into a vector
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Self::Single(value) => alloc::vec![value],
            Self::Sequence(values) => values,
        }
    }

    /// Apply `f` to every window's value
    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> PerWindow<U> {
        match self {
            Self::Single(value) => PerWindow::Single(f(value)),
            Self::Sequence(values) => PerWindow::Sequence(values.into_iter().map(f).collect()),
        }
    }
}

/// Fluxes per window plus the concatenated chopped earth wind
#[derive(Debug, Clone, PartialEq)]
pub struct FluxAndWind {
    /// Flux estimate of every window
    pub fluxes: PerWindow<FluxEstimate>,
    /// Earth-frame wind of all windows, chopped and concatenated
    pub wind: EarthWind,
}

/// Everything produced for one window
#[derive(Debug, Clone, PartialEq)]
pub struct WindowReport {
    /// Window position and source
    pub span: WindowSpan,
    /// Compass classification the window was processed with
    pub quality: CompassQuality,
    /// Despike counts and faults
    pub despike: DespikeReport,
    /// Representative and chopped timestamps
    pub timestamps: WindowTimestamp,
    /// Chopped earth-frame wind, NaN when a motion channel faulted
    pub wind: EarthWind,
    /// Chopped sonic temperature (°C) when sound was supplied and clean
    pub temperature: Option<Vec<f64>>,
    /// Flux result
    pub fluxes: FluxEstimate,
}

/// Conditioned, despiked and classified window awaiting motion correction
#[derive(Debug, Clone)]
pub(crate) struct ClassifiedWindow {
    pub span: WindowSpan,
    pub timestamps: Vec<f64>,
    pub quality: CompassQuality,
    pub motion: Result<MotionWindow, DataFault>,
    pub sound: Option<Result<Vec<f64>, DataFault>>,
    pub despike: DespikeReport,
}

/// Windowed motion-correction and flux engine
#[derive(Debug, Clone)]
pub struct FluxProcessor {
    config: ProcessingConfig,
    filters: FilterBank,
    remover: SpikeRemover,
    corrector: MotionCorrector,
    chopper: EdgeChopper,
}

impl FluxProcessor {
    /// Validate `config` and design the filter bank
    pub fn new(config: ProcessingConfig) -> ContractResult<Self> {
        config.validate()?;
        let fs = config.sampling.sample_rate_hz;
        Ok(Self {
            filters: FilterBank::design(&config.filters, fs),
            remover: SpikeRemover::new(config.despike),
            corrector: MotionCorrector::new(fs, config.platform),
            chopper: EdgeChopper::new(&config.sampling),
            config,
        })
    }

    /// Active configuration
    pub fn config(&self) -> &ProcessingConfig {
        &self.config
    }

    /// Filter bank shared by all windows
    pub fn filters(&self) -> &FilterBank {
        &self.filters
    }

    /// Plan windows for a timestamp channel
    pub fn plan(&self, timestamps: &[f64]) -> ContractResult<WindowPlan> {
        WindowPlan::from_timestamps(timestamps, &self.config.sampling)
    }

    /// Run every stage and report each window
    pub fn process(&self, inputs: &MotionInputs<'_>, sound: Option<&[f64]>) -> ContractResult<Vec<WindowReport>> {
        let windows = self.condition_and_classify(inputs, sound)?;
        Ok(map_windows(windows, |window| self.reduce(window)))
    }

    /// Fluxes per window and the concatenated earth wind
    pub fn flux_and_wind(&self, inputs: &MotionInputs<'_>, sound: &[f64]) -> ContractResult<FluxAndWind> {
        let reports = self.process(inputs, Some(sound))?;
        let mut wind = EarthWind::default();
        for report in &reports {
            wind.extend(&report.wind);
        }
        let fluxes = PerWindow::from_vec(reports.into_iter().map(|r| r.fluxes).collect());
        Ok(FluxAndWind { fluxes, wind })
    }

    /// Alongwind momentum flux `⟨u′w′⟩` per window
    pub fn flux_alongwind(&self, inputs: &MotionInputs<'_>) -> ContractResult<PerWindow<f64>> {
        self.per_window(inputs, None, |r| r.fluxes.uw())
    }

    /// Crosswind momentum flux `⟨v′w′⟩` per window
    pub fn flux_crosswind(&self, inputs: &MotionInputs<'_>) -> ContractResult<PerWindow<f64>> {
        self.per_window(inputs, None, |r| r.fluxes.vw())
    }

    /// Buoyancy flux `⟨w′T′⟩` per window
    pub fn heat_flux(&self, inputs: &MotionInputs<'_>, sound: &[f64]) -> ContractResult<PerWindow<f64>> {
        self.per_window(inputs, Some(sound), |r| r.fluxes.wt())
    }

    /// Chopped northward wind, all windows concatenated
    pub fn wind_north(&self, inputs: &MotionInputs<'_>) -> ContractResult<Vec<f64>> {
        self.concatenated(inputs, |w| &w.north)
    }

    /// Chopped westward wind, all windows concatenated
    pub fn wind_west(&self, inputs: &MotionInputs<'_>) -> ContractResult<Vec<f64>> {
        self.concatenated(inputs, |w| &w.west)
    }

    /// Chopped upward wind, all windows concatenated
    pub fn wind_up(&self, inputs: &MotionInputs<'_>) -> ContractResult<Vec<f64>> {
        self.concatenated(inputs, |w| &w.up)
    }

    /// Chopped sonic temperature (°C), all windows concatenated
    pub fn temperature(&self, timestamps: &[f64], sound: &[f64]) -> ContractResult<Vec<f64>> {
        let plan = self.plan(timestamps)?;
        check_channel(Channel::Sound.name(), sound, timestamps.len())?;
        Ok(plan
            .condition(sound)
            .iter()
            .flat_map(|window| sonic_temperatures(&self.chopper.chop(window)))
            .collect())
    }

    /// Chopped per-sample timestamps, all windows concatenated
    pub fn time_l1(&self, timestamps: &[f64]) -> ContractResult<Vec<f64>> {
        let plan = self.plan(timestamps)?;
        Ok(plan
            .condition(timestamps)
            .iter()
            .flat_map(|window| self.chopper.chop(window))
            .collect())
    }

    /// Representative timestamp per window
    pub fn time_l2(&self, timestamps: &[f64]) -> ContractResult<PerWindow<f64>> {
        let plan = self.plan(timestamps)?;
        let index = self.config.sampling.representative_index();
        Ok(PerWindow::from_vec(
            plan.condition(timestamps)
                .iter()
                .map(|window| window_timestamp(window, index))
                .collect(),
        ))
    }

    /// Validate, condition, despike and classify every window
    pub(crate) fn condition_and_classify(
        &self,
        inputs: &MotionInputs<'_>,
        sound: Option<&[f64]>,
    ) -> ContractResult<Vec<ClassifiedWindow>> {
        inputs.validate()?;
        if let Some(sound) = sound {
            check_channel(Channel::Sound.name(), sound, inputs.len())?;
        }
        let plan = self.plan(inputs.timestamps)?;
        let window_len = plan.window_len();
        Ok(map_windows(plan.spans().to_vec(), |span| {
            self.classify_span(inputs, sound, span, window_len)
        }))
    }

    fn classify_span(
        &self,
        inputs: &MotionInputs<'_>,
        sound: Option<&[f64]>,
        span: WindowSpan,
        window_len: usize,
    ) -> ClassifiedWindow {
        let mut despike = DespikeReport::default();
        let mut clean = |channel: Channel, raw: &[f64]| -> Option<Vec<f64>> {
            let conditioned = span.condition(raw, window_len);
            match self.remover.despike(channel, &conditioned) {
                Ok(out) => {
                    despike.record(channel, out.replaced);
                    Some(out.samples)
                }
                Err(fault) => {
                    log_warn!("window {}: {}", span.index, fault);
                    despike.record_fault(fault);
                    None
                }
            }
        };

        let wind = Channel::WIND.map(|c| (c, inputs.wind[axis(c)]));
        let rate = Channel::RATE.map(|c| (c, inputs.rate[axis(c)]));
        let accel = Channel::ACCEL.map(|c| (c, inputs.accel[axis(c)]));
        let wind = wind.map(|(c, raw)| clean(c, raw));
        let rate = rate.map(|(c, raw)| clean(c, raw));
        let accel = accel.map(|(c, raw)| clean(c, raw));
        let sound = sound.map(|raw| clean(Channel::Sound, raw));

        let heading = span.condition(inputs.heading, window_len);
        let quality = classify(&heading, &self.config.compass);

        let motion = match (all_three(wind), all_three(rate), all_three(accel)) {
            (Some(wind), Some(rate), Some(accel)) => Ok(MotionWindow {
                wind,
                rate,
                accel,
                heading,
                latitude: span.condition(inputs.latitude, window_len),
            }),
            _ => Err(despike
                .motion_fault()
                .unwrap_or(DataFault::NoValidSamples { channel: Channel::WindX })),
        };
        let sound = sound.map(|s| match s {
            Some(samples) => Ok(samples),
            None => Err(despike
                .sound_fault()
                .unwrap_or(DataFault::NoValidSamples { channel: Channel::Sound })),
        });

        log_debug!(
            "window {} (segment {}, {} padded): compass {:?}, {} samples replaced",
            span.index,
            span.segment,
            span.padding(window_len),
            quality,
            despike.total_replaced()
        );

        ClassifiedWindow {
            span,
            timestamps: span.condition(inputs.timestamps, window_len),
            quality,
            motion,
            sound,
            despike,
        }
    }

    fn reduce(&self, window: ClassifiedWindow) -> WindowReport {
        let timestamps = self.chopper.timestamps(&window.timestamps);
        let temperature = match &window.sound {
            Some(Ok(sound)) => Some(sonic_temperatures(&self.chopper.chop(sound))),
            _ => None,
        };

        let (wind, fluxes) = match &window.motion {
            Ok(motion) => {
                let path = self.filters.select(window.quality);
                let solution = self.corrector.correct(motion, path);
                let wind = self.chopper.chop_wind(&rotate_to_earth(&solution));
                let fluxes = match &window.sound {
                    Some(Err(fault)) => FluxEstimate::Missing(*fault),
                    _ => FluxEstimate::Values(Fluxes::from_wind(&wind, temperature.as_deref())),
                };
                (wind, fluxes)
            }
            Err(fault) => (
                EarthWind::nan(self.chopper.chopped_len(window.timestamps.len())),
                FluxEstimate::Missing(*fault),
            ),
        };

        WindowReport {
            span: window.span,
            quality: window.quality,
            despike: window.despike,
            timestamps,
            wind,
            temperature,
            fluxes,
        }
    }

    fn per_window(
        &self,
        inputs: &MotionInputs<'_>,
        sound: Option<&[f64]>,
        select: impl Fn(&WindowReport) -> f64,
    ) -> ContractResult<PerWindow<f64>> {
        let reports = self.process(inputs, sound)?;
        Ok(PerWindow::from_vec(reports.iter().map(select).collect()))
    }

    fn concatenated(
        &self,
        inputs: &MotionInputs<'_>,
        component: impl Fn(&EarthWind) -> &Vec<f64>,
    ) -> ContractResult<Vec<f64>> {
        let reports = self.process(inputs, None)?;
        Ok(reports
            .iter()
            .flat_map(|r| component(&r.wind).iter().copied())
            .collect())
    }
}

fn default_processor() -> ContractResult<FluxProcessor> {
    FluxProcessor::new(ProcessingConfig::default())
}

/// [`FluxProcessor::flux_and_wind`] with the default configuration
pub fn flux_and_wind(inputs: &MotionInputs<'_>, sound: &[f64]) -> ContractResult<FluxAndWind> {
    default_processor()?.flux_and_wind(inputs, sound)
}

/// [`FluxProcessor::flux_alongwind`] with the default configuration
pub fn flux_alongwind(inputs: &MotionInputs<'_>) -> ContractResult<PerWindow<f64>> {
    default_processor()?.flux_alongwind(inputs)
}

/// [`FluxProcessor::flux_crosswind`] with the default configuration
pub fn flux_crosswind(inputs: &MotionInputs<'_>) -> ContractResult<PerWindow<f64>> {
    default_processor()?.flux_crosswind(inputs)
}

/// [`FluxProcessor::heat_flux`] with the default configuration
pub fn heat_flux(inputs: &MotionInputs<'_>, sound: &[f64]) -> ContractResult<PerWindow<f64>> {
    default_processor()?.heat_flux(inputs, sound)
}

/// [`FluxProcessor::wind_north`] with the default configuration
pub fn wind_north(inputs: &MotionInputs<'_>) -> ContractResult<Vec<f64>> {
    default_processor()?.wind_north(inputs)
}

/// [`FluxProcessor::wind_west`] with the default configuration
pub fn wind_west(inputs: &MotionInputs<'_>) -> ContractResult<Vec<f64>> {
    default_processor()?.wind_west(inputs)
}

/// [`FluxProcessor::wind_up`] with the default configuration
pub fn wind_up(inputs: &MotionInputs<'_>) -> ContractResult<Vec<f64>> {
    default_processor()?.wind_up(inputs)
}

/// [`FluxProcessor::temperature`] with the default configuration
pub fn temperature(timestamps: &[f64], sound: &[f64]) -> ContractResult<Vec<f64>> {
    default_processor()?.temperature(timestamps, sound)
}

/// [`FluxProcessor::time_l1`] with the default configuration
pub fn time_l1(timestamps: &[f64]) -> ContractResult<Vec<f64>> {
    default_processor()?.time_l1(timestamps)
}

/// [`FluxProcessor::time_l2`] with the default configuration
pub fn time_l2(timestamps: &[f64]) -> ContractResult<PerWindow<f64>> {
    default_processor()?.time_l2(timestamps)
}

fn axis(channel: Channel) -> usize {
    match channel {
        Channel::WindX | Channel::RateX | Channel::AccelX => 0,
        Channel::WindY | Channel::RateY | Channel::AccelY => 1,
        _ => 2,
    }
}

fn all_three(channels: [Option<Vec<f64>>; 3]) -> Option<[Vec<f64>; 3]> {
    let [x, y, z] = channels;
    Some([x?, y?, z?])
}

#[cfg(feature = "parallel")]
fn map_windows<T, R, F>(items: Vec<T>, f: F) -> Vec<R>
where
    T: Send,
    R: Send,
    F: Fn(T) -> R + Sync + Send,
{
    use rayon::prelude::*;
    items.into_par_iter().map(f).collect()
}

#[cfg(not(feature = "parallel"))]
fn map_windows<T, R, F>(items: Vec<T>, f: F) -> Vec<R>
where
    F: Fn(T) -> R,
{
    items.into_iter().map(f).collect()
}
