//! LaserHarp - Main entry point
//!
//! - `target_os = "espidf"`: firmware. Sampling and control loop share one
//!   task, ticking at 1 kHz.
//! - Any other target: host simulation. A sampling thread drives scripted
//!   sensors for a 7-beam harp while the main thread runs the scheduler into
//!   the software tone bank and prints the log streams.

#![cfg_attr(target_os = "espidf", no_std)]
#![cfg_attr(target_os = "espidf", no_main)]

/// One beam per diatonic degree.
const BEAM_COUNT: usize = 7;

#[cfg(target_os = "espidf")]
mod firmware {
    use esp_idf_svc::sys as esp_idf_sys;

    use laser_harp::{
        hal::{BeamSensor, ToneOutput},
        logging::{format_entry, LogStream},
        updater::{tick_all, updaters_for},
        BeamBank, BeamId, BeamScheduler, CONFIG, ISR_LOG, LOOP_LOG,
    };

    use super::BEAM_COUNT;

    // Static allocations: shared beam records live for the whole program.
    static BEAMS: BeamBank<BEAM_COUNT> = BeamBank::new();

    /// Photodiode on one ADC1 channel (beam N on channel N).
    struct AdcBeam;

    impl BeamSensor for AdcBeam {
        fn read(&mut self) -> u16 {
            // TODO: read the beam's ADC1 channel through the esp-idf-hal
            // oneshot driver once the board pinout is fixed. Full scale
            // reads as unobstructed until then.
            CONFIG.adc_max()
        }
    }

    /// One LEDC PWM channel per beam.
    struct LedcTone;

    impl ToneOutput for LedcTone {
        fn start(&mut self, _beam: BeamId, _hz: u16) {
            // TODO: set LEDC timer frequency for the beam's channel, 50% duty.
        }

        fn stop(&mut self, _beam: BeamId) {
            // TODO: set LEDC duty to 0 for the beam's channel.
        }

        fn change(&mut self, beam: BeamId, hz: u16) {
            self.start(beam, hz);
        }
    }

    pub fn run() -> ! {
        // Single stream producer: every updater runs from this one tick.
        let mut updaters = updaters_for(&BEAMS, &CONFIG, |_| AdcBeam)
            .map(|updater| updater.with_log(&ISR_LOG));
        let mut scheduler = BeamScheduler::new(&BEAMS).with_log(&LOOP_LOG);
        let mut tone = LedcTone;

        laser_harp::rt_info!(LOOP_LOG, 0, "{}", env!("VERSION_STRING"));

        loop {
            // 1. Sampling tick
            tick_all(&mut updaters);

            // 2. Control loop pass
            scheduler.poll(&mut tone);

            // 3. Best-effort log output
            drain(&ISR_LOG);
            drain(&LOOP_LOG);

            // 4. Wait for next tick
            unsafe {
                esp_idf_sys::vTaskDelay(1);
            }
        }
    }

    fn drain(stream: &LogStream) {
        let mut buf = [0u8; 96];
        while let Some(entry) = stream.drain() {
            let len = format_entry(&entry, &mut buf);
            // SAFETY: "%.*s" reads exactly `len` bytes from `buf`.
            unsafe {
                esp_idf_sys::printf(
                    b"%.*s\0".as_ptr() as *const _,
                    len as core::ffi::c_int,
                    buf.as_ptr(),
                );
            }
        }
    }
}

#[cfg(target_os = "espidf")]
#[no_mangle]
fn main() {
    esp_idf_svc::sys::link_patches();
    firmware::run();
}

#[cfg(not(target_os = "espidf"))]
mod simulation {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::thread;
    use std::time::Duration;

    use laser_harp::{
        audio::ToneBank,
        hal::{ScriptedSensor, ToneCommand, ToneOutput},
        logging::{format_entry, LogLevel, LogStream},
        updater::{tick_all, BeamUpdater},
        BeamBank, BeamId, BeamScheduler, CONFIG, ISR_LOG, LOOP_LOG, NOTE_TABLE,
    };

    use super::BEAM_COUNT;

    static BEAMS: BeamBank<BEAM_COUNT> = BeamBank::new();

    /// Sampling period.
    const TICK: Duration = Duration::from_millis(1);

    /// Length of the performance in ticks.
    const PERFORMANCE_TICKS: usize = 1200;

    /// Audio sample rate of the software tone bank.
    const SAMPLE_RATE: u32 = 8000;

    /// Full light on the photodiode.
    const UNOBSTRUCTED: u16 = 1023;

    /// Small deterministic sensor jitter, in ADC counts.
    const JITTER: [i16; 6] = [0, 3, -2, 5, -4, 1];

    /// Tone bank that also echoes every command.
    struct Speaker {
        bank: ToneBank<BEAM_COUNT>,
    }

    impl ToneOutput for Speaker {
        fn start(&mut self, beam: BeamId, hz: u16) {
            let note = NOTE_TABLE.nearest(hz);
            println!("  {:<28} ({}{})", ToneCommand::Start { beam, hz }.to_string(), note.name(), note.octave);
            self.bank.start(beam, hz);
        }

        fn stop(&mut self, beam: BeamId) {
            println!("  {}", ToneCommand::Stop { beam });
            self.bank.stop(beam);
        }

        fn change(&mut self, beam: BeamId, hz: u16) {
            println!("  {}", ToneCommand::Change { beam, hz });
            self.bank.change(beam, hz);
        }
    }

    /// Beam `id` is plucked with a hand held near its own C4..B4 note,
    /// staggered so chords build up and release.
    fn script(id: BeamId) -> Vec<u16> {
        let hand = NOTE_TABLE.frequency(4, id as u8).unwrap_or(440);
        let enter = 100 + id * 80;
        let leave = enter + 400;

        (0..PERFORMANCE_TICKS)
            .map(|t| {
                if t < enter || t >= leave {
                    UNOBSTRUCTED
                } else {
                    let drift = if t > enter + 200 && id % 2 == 0 { 30 } else { 0 };
                    (hand as i32 + drift + JITTER[t % JITTER.len()] as i32) as u16
                }
            })
            .collect()
    }

    fn drain(stream: &LogStream) {
        let mut buf = [0u8; 128];
        while let Some(entry) = stream.drain() {
            let len = format_entry(&entry, &mut buf);
            print!("{}", String::from_utf8_lossy(&buf[..len]));
        }
    }

    pub fn run() {
        ISR_LOG.set_max_level(LogLevel::Debug);
        laser_harp::rt_info!(LOOP_LOG, 0, "{} ({} beams)", env!("VERSION_STRING"), BEAM_COUNT);
        drain(&LOOP_LOG);

        let scripts: Vec<Vec<u16>> = (0..BEAM_COUNT).map(script).collect();
        let running = AtomicBool::new(true);

        thread::scope(|s| {
            // Sampling context: stands in for the timer interrupt.
            s.spawn(|| {
                let mut updaters: Vec<BeamUpdater<'_, ScriptedSensor<'_>>> = scripts
                    .iter()
                    .enumerate()
                    .map(|(id, script)| {
                        BeamUpdater::new(id, ScriptedSensor::new(script), &BEAMS[id], &CONFIG)
                            .with_log(&ISR_LOG)
                    })
                    .collect();

                for _ in 0..PERFORMANCE_TICKS {
                    tick_all(&mut updaters);
                    thread::sleep(TICK);
                }
                running.store(false, Ordering::Release);
            });

            // Control loop.
            let mut scheduler = BeamScheduler::new(&BEAMS).with_log(&LOOP_LOG);
            let mut speaker = Speaker {
                bank: ToneBank::new(SAMPLE_RATE),
            };
            let mut pcm = [0i16; (SAMPLE_RATE / 1000) as usize];
            let mut peak = 0i16;

            while running.load(Ordering::Acquire) {
                scheduler.poll(&mut speaker);
                speaker.bank.render(&mut pcm);
                peak = pcm.iter().fold(peak, |p, &s| p.max(s.saturating_abs()));
                drain(&ISR_LOG);
                drain(&LOOP_LOG);
                thread::sleep(TICK);
            }

            // Final pass picks up the last releases.
            scheduler.poll(&mut speaker);
            scheduler.silence_all(&mut speaker);
            drain(&ISR_LOG);
            drain(&LOOP_LOG);

            println!(
                "done: {} passes, peak level {}, dropped logs isr={} loop={}",
                scheduler.passes(),
                peak,
                ISR_LOG.dropped(),
                LOOP_LOG.dropped()
            );
        });
    }
}

#[cfg(not(target_os = "espidf"))]
fn main() {
    simulation::run();
}
