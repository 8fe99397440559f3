//! Peaking Band Filter
//!
//! One node of the equalizer chain: an RBJ cookbook peaking EQ centered on a
//! fixed frequency. Gain changes swap coefficients in place, so the delay
//! lines keep running and there is no click when a slider moves.

use biquad::{Biquad, Coefficients, DirectForm2Transposed, ToHertz, Type};

use crate::error::DspError;

/// A peaking filter with one biquad state per channel
pub struct PeakingFilter {
    frequency: f32,
    q: f32,
    gain_db: f32,
    sample_rate: f32,
    // DirectForm2Transposed: better numerical stability than DF1
    states: Vec<DirectForm2Transposed<f32>>,
}

impl PeakingFilter {
    /// Create a filter at 0 dB
    ///
    /// Fails when the frequency sits above Nyquist for `sample_rate` or the
    /// parameters are otherwise unusable.
    pub fn new(frequency: f32, q: f32, sample_rate: f32, channels: usize) -> Result<Self, DspError> {
        if sample_rate.is_nan() || sample_rate <= 0.0 {
            return Err(DspError::InvalidSampleRate(sample_rate));
        }
        if channels == 0 {
            return Err(DspError::InvalidChannelCount(channels));
        }

        let coeffs = coefficients(frequency, q, 0.0, sample_rate)?;
        let states = (0..channels)
            .map(|_| DirectForm2Transposed::<f32>::new(coeffs))
            .collect();

        Ok(Self {
            frequency,
            q,
            gain_db: 0.0,
            sample_rate,
            states,
        })
    }

    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    pub fn q(&self) -> f32 {
        self.q
    }

    /// Current live gain in dB
    pub fn gain_db(&self) -> f32 {
        self.gain_db
    }

    /// Set the live gain in dB
    ///
    /// The previous gain stays in place if the coefficients cannot be built.
    pub fn set_gain_db(&mut self, gain_db: f32) -> Result<(), DspError> {
        let coeffs = coefficients(self.frequency, self.q, gain_db, self.sample_rate)?;
        for state in &mut self.states {
            state.update_coefficients(coeffs);
        }
        self.gain_db = gain_db;
        Ok(())
    }

    pub fn channels(&self) -> usize {
        self.states.len()
    }

    /// Run an interleaved buffer through the filter in place
    ///
    /// # Real-time Safety
    /// No allocations. O(n) where n = buffer length.
    #[inline]
    pub fn process_interleaved(&mut self, buffer: &mut [f32]) {
        let channels = self.states.len();
        for frame in buffer.chunks_mut(channels) {
            for (sample, state) in frame.iter_mut().zip(self.states.iter_mut()) {
                *sample = state.run(*sample);
            }
        }
    }

    /// Clear delay lines
    pub fn reset(&mut self) {
        for state in &mut self.states {
            state.reset_state();
        }
    }
}

fn coefficients(
    frequency: f32,
    q: f32,
    gain_db: f32,
    sample_rate: f32,
) -> Result<Coefficients<f32>, DspError> {
    Coefficients::<f32>::from_params(
        Type::PeakingEQ(gain_db),
        sample_rate.hz(),
        frequency.hz(),
        q,
    )
    .map_err(|_| DspError::InvalidCoefficients {
        frequency,
        sample_rate,
    })
}
