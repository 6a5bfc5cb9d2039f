//! Beam scheduler tests

use laser_harp::logging::LogStream;
use laser_harp::{BeamBank, BeamScheduler, BeamSnapshot, ChangeIndicator, ToneCommand, ToneOutput, Voice};

#[derive(Default)]
struct Recorder(Vec<ToneCommand>);

impl ToneOutput for Recorder {
    fn start(&mut self, beam: usize, hz: u16) {
        self.0.push(ToneCommand::Start { beam, hz });
    }
    fn stop(&mut self, beam: usize) {
        self.0.push(ToneCommand::Stop { beam });
    }
    fn change(&mut self, beam: usize, hz: u16) {
        self.0.push(ToneCommand::Change { beam, hz });
    }
}

fn ind(raw: i8) -> ChangeIndicator {
    ChangeIndicator::from_raw(raw)
}

#[test]
fn test_fresh_bank_is_silent() {
    let bank = BeamBank::<7>::new();
    let mut scheduler = BeamScheduler::new(&bank);
    let mut out = Recorder::default();

    assert_eq!(scheduler.poll(&mut out), 0);
    assert!(out.0.is_empty());
    assert_eq!(scheduler.sounding_count(), 0);
    assert_eq!(scheduler.passes(), 1);
}

#[test]
fn test_one_call_per_beam_per_pass() {
    let bank = BeamBank::<3>::new();
    let mut scheduler = BeamScheduler::new(&bank);
    let mut out = Recorder::default();

    bank[0].publish(BeamSnapshot::sounding(262, ind(0)));
    bank[2].publish(BeamSnapshot::sounding(392, ind(0)));

    assert_eq!(scheduler.poll(&mut out), 2);
    assert_eq!(
        out.0,
        vec![
            ToneCommand::Start { beam: 0, hz: 262 },
            ToneCommand::Start { beam: 2, hz: 392 },
        ]
    );

    // Nothing new: nothing issued.
    assert_eq!(scheduler.poll(&mut out), 0);
    assert_eq!(out.0.len(), 2);
}

#[test]
fn test_start_change_stop_sequence() {
    let bank = BeamBank::<1>::new();
    let mut scheduler = BeamScheduler::new(&bank);
    let mut out = Recorder::default();

    bank[0].publish(BeamSnapshot::sounding(440, ind(0)));
    scheduler.poll(&mut out);
    assert_eq!(scheduler.voice(0), Some(Voice::Sounding(440)));

    bank[0].publish(BeamSnapshot::sounding(494, ind(1)));
    scheduler.poll(&mut out);
    assert_eq!(scheduler.voice(0), Some(Voice::Sounding(494)));

    bank[0].publish(BeamSnapshot::silent(ind(2)));
    scheduler.poll(&mut out);
    assert_eq!(scheduler.voice(0), Some(Voice::Silent));

    assert_eq!(
        out.0,
        vec![
            ToneCommand::Start { beam: 0, hz: 440 },
            ToneCommand::Change { beam: 0, hz: 494 },
            ToneCommand::Stop { beam: 0 },
        ]
    );
}

#[test]
fn test_missed_intermediate_states_collapse() {
    let bank = BeamBank::<1>::new();
    let mut scheduler = BeamScheduler::new(&bank);
    let mut out = Recorder::default();

    // on, off, on at a new pitch: the pass only sees the last one.
    bank[0].publish(BeamSnapshot::sounding(440, ind(0)));
    bank[0].publish(BeamSnapshot::silent(ind(1)));
    bank[0].publish(BeamSnapshot::sounding(523, ind(2)));

    assert_eq!(scheduler.poll(&mut out), 1);
    assert_eq!(out.0, vec![ToneCommand::Start { beam: 0, hz: 523 }]);
}

#[test]
fn test_on_off_between_passes_issues_nothing() {
    let bank = BeamBank::<1>::new();
    let mut scheduler = BeamScheduler::new(&bank);
    let mut out = Recorder::default();

    scheduler.poll(&mut out);
    bank[0].publish(BeamSnapshot::sounding(440, ind(0)));
    bank[0].publish(BeamSnapshot::silent(ind(1)));

    assert_eq!(scheduler.poll(&mut out), 0, "Voice already silent");
    assert!(out.0.is_empty());
}

#[test]
fn test_late_scheduler_picks_up_live_note() {
    let bank = BeamBank::<1>::new();
    bank[0].publish(BeamSnapshot::sounding(330, ind(0)));

    let mut scheduler = BeamScheduler::new(&bank);
    let mut out = Recorder::default();
    assert_eq!(scheduler.poll(&mut out), 1);
    assert_eq!(out.0, vec![ToneCommand::Start { beam: 0, hz: 330 }]);
}

#[test]
fn test_indicator_wraparound() {
    let bank = BeamBank::<1>::new();
    let mut scheduler = BeamScheduler::new(&bank);
    let mut out = Recorder::default();

    bank[0].publish(BeamSnapshot::sounding(440, ind(i8::MAX)));
    scheduler.poll(&mut out);
    bank[0].publish(BeamSnapshot::silent(ind(i8::MAX).next()));
    scheduler.poll(&mut out);

    assert_eq!(ind(i8::MAX).next(), ind(i8::MIN));
    assert_eq!(out.0.last(), Some(&ToneCommand::Stop { beam: 0 }));
}

#[test]
fn test_silence_all_stops_sounding_only() {
    let bank = BeamBank::<3>::new();
    let mut scheduler = BeamScheduler::new(&bank);
    let mut out = Recorder::default();

    bank[1].publish(BeamSnapshot::sounding(294, ind(0)));
    scheduler.poll(&mut out);
    out.0.clear();

    assert_eq!(scheduler.silence_all(&mut out), 1);
    assert_eq!(out.0, vec![ToneCommand::Stop { beam: 1 }]);
    assert_eq!(scheduler.sounding_count(), 0);
}

#[test]
fn test_commands_logged() {
    let bank = BeamBank::<1>::new();
    let log = LogStream::new();
    let mut scheduler = BeamScheduler::new(&bank).with_log(&log);
    let mut out = Recorder::default();

    bank[0].publish(BeamSnapshot::sounding(440, ind(0)));
    scheduler.poll(&mut out);

    let entry = log.drain().expect("Start should be logged");
    assert_eq!(entry.text(), "start beam 0 @ 440 Hz");
    assert_eq!(entry.stamp, 1);
}

#[test]
fn test_unknown_beam_voice_is_none() {
    let bank = BeamBank::<2>::new();
    let scheduler = BeamScheduler::new(&bank);
    assert_eq!(scheduler.voice(2), None);
}
