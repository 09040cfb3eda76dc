//! Synthesized message tone; no external audio asset.

/// Oscillator frequency of the alert tone.
#[cfg(feature = "hydrate")]
const TONE_FREQUENCY_HZ: f32 = 800.0;
/// Gain envelope start value.
#[cfg(feature = "hydrate")]
const TONE_START_GAIN: f32 = 0.3;
/// Gain envelope floor; exponential ramps cannot reach zero.
#[cfg(feature = "hydrate")]
const TONE_END_GAIN: f32 = 0.01;
/// Envelope decay time in seconds; the oscillator stops at its end.
#[cfg(feature = "hydrate")]
const TONE_DECAY_S: f64 = 0.3;

/// Play a short sine chime through a decaying gain envelope.
///
/// Failures are silent; a blocked or missing audio context must never
/// break message handling.
#[cfg(feature = "hydrate")]
pub fn play_message_tone() {
    let Ok(ctx) = web_sys::AudioContext::new() else {
        return;
    };
    let Ok(oscillator) = ctx.create_oscillator() else {
        return;
    };
    let Ok(gain) = ctx.create_gain() else {
        return;
    };

    oscillator.set_type(web_sys::OscillatorType::Sine);
    oscillator.frequency().set_value(TONE_FREQUENCY_HZ);

    let now = ctx.current_time();
    let _ = gain.gain().set_value_at_time(TONE_START_GAIN, now);
    let _ = gain
        .gain()
        .exponential_ramp_to_value_at_time(TONE_END_GAIN, now + TONE_DECAY_S);

    let _ = oscillator.connect_with_audio_node(&gain);
    let _ = gain.connect_with_audio_node(&ctx.destination());
    let _ = oscillator.start();
    let _ = oscillator.stop_with_when(now + TONE_DECAY_S);
}
