//! Software tone bank tests

use laser_harp::audio::{FadeState, SquareVoice, ToneBank, VOICE_LEVEL};
use laser_harp::{BeamBank, BeamScheduler, BeamSnapshot, ChangeIndicator, ToneOutput};

const SAMPLE_RATE: u32 = 8000;

#[test]
fn test_silent_bank_renders_zeros() {
    let mut bank = ToneBank::<4>::new(SAMPLE_RATE);
    let mut pcm = [1i16; 64];
    bank.render(&mut pcm);
    assert!(pcm.iter().all(|&s| s == 0), "Idle bank should be silent");
}

#[test]
fn test_started_voice_reaches_full_level() {
    let mut bank = ToneBank::<4>::with_fade(SAMPLE_RATE, 8);
    bank.start(2, 440);

    let mut pcm = [0i16; 64];
    bank.render(&mut pcm);

    let peak = pcm.iter().map(|s| s.saturating_abs()).max().unwrap_or(0);
    assert_eq!(peak, VOICE_LEVEL);
    assert_eq!(bank.audible_count(), 1);
    assert_eq!(bank.voice(2).map(|v| v.fade_state()), Some(FadeState::Sustain));
}

#[test]
fn test_stop_ramps_down() {
    let mut bank = ToneBank::<1>::with_fade(SAMPLE_RATE, 8);
    bank.start(0, 440);
    let mut pcm = [0i16; 32];
    bank.render(&mut pcm);

    bank.stop(0);
    bank.render(&mut pcm[..4]);
    assert_eq!(bank.voice(0).map(|v| v.fade_state()), Some(FadeState::FadeOut));

    bank.render(&mut pcm);
    assert_eq!(bank.audible_count(), 0);
    assert_eq!(*pcm.last().unwrap(), 0);
}

#[test]
fn test_square_period() {
    // 1000 Hz at 8 kHz: 4 high samples then 4 low.
    let mut voice = SquareVoice::new(SAMPLE_RATE, 1);
    voice.note_on(1000);
    let samples: Vec<i16> = (0..8).map(|_| voice.next_sample()).collect();
    assert!(samples[..4].iter().all(|&s| s > 0));
    assert!(samples[4..].iter().all(|&s| s < 0));
}

#[test]
fn test_mix_saturates() {
    let mut bank = ToneBank::<8>::with_fade(SAMPLE_RATE, 1);
    for beam in 0..8 {
        bank.start(beam, 1000);
    }
    let mut pcm = [0i16; 8];
    bank.render(&mut pcm);
    assert_eq!(pcm[0], i16::MAX);
    assert_eq!(pcm[4], i16::MIN);
}

#[test]
fn test_out_of_range_beam_ignored() {
    let mut bank = ToneBank::<2>::new(SAMPLE_RATE);
    bank.start(5, 440);
    bank.change(5, 494);
    bank.stop(5);
    assert_eq!(bank.audible_count(), 0);
}

#[test]
fn test_scheduler_drives_bank() {
    let beams = BeamBank::<3>::new();
    let mut scheduler = BeamScheduler::new(&beams);
    let mut bank = ToneBank::<3>::new(SAMPLE_RATE);

    beams[0].publish(BeamSnapshot::sounding(262, ChangeIndicator::from_raw(0)));
    beams[2].publish(BeamSnapshot::sounding(392, ChangeIndicator::from_raw(0)));
    scheduler.poll(&mut bank);
    assert_eq!(bank.audible_count(), 2);

    scheduler.silence_all(&mut bank);
    let mut pcm = [0i16; 64];
    bank.render(&mut pcm);
    assert_eq!(bank.audible_count(), 0);
}
