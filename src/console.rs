//! Line-oriented terminal front end: parses user commands into calls on the
//! command layer and prints the events the controller emits.

use anyhow::{Context, Result};
use chrono::Local;
use log::debug;
use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt},
    sync::mpsc::UnboundedReceiver,
};

use crate::{
    booking::{commands, ParkingSnapshot},
    catalog::Catalog,
    events::{CountdownEvent, ParkingEvent},
    notice::NO_AVAILABILITY,
    parking::{Selection, Spot, SpotId},
    AppState,
};

const USAGE: &str = "\
commands:
  spots                                      show the parking map
  free                                       list free spots
  cities                                     list cities
  malls <city>                               list malls in a city
  durations                                  list reservation lengths
  book <city> <spot> <minutes> <mall|number> reserve a spot
  cancel                                     cancel the active reservation
  status                                     show the active reservation
  reset                                      regenerate all spots
  settings                                   show the active settings
  help                                       show this help
  quit                                       exit";

/// Help text with the reservation lengths the catalog accepts.
pub fn usage(catalog: &Catalog) -> String {
    let durations: Vec<String> = catalog.durations().iter().map(u32::to_string).collect();
    format!(
        "{USAGE}\nminutes: {} (default {})",
        durations.join(", "),
        catalog.default_duration()
    )
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    Help,
    Spots,
    Free,
    Cities,
    Malls(String),
    Durations,
    Book(Selection),
    Cancel,
    Status,
    Reset,
    Settings,
    Quit,
}

impl ConsoleCommand {
    pub fn parse(line: &str, catalog: &Catalog) -> Result<Self, String> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let Some(head) = tokens.first() else {
            return Err("empty command".to_string());
        };

        match head.to_ascii_lowercase().as_str() {
            "help" | "?" => Ok(Self::Help),
            "spots" | "map" => Ok(Self::Spots),
            "free" => Ok(Self::Free),
            "cities" => Ok(Self::Cities),
            "malls" => tokens
                .get(1)
                .map(|city| Self::Malls(city.to_string()))
                .ok_or_else(|| "usage: malls <city>".to_string()),
            "durations" => Ok(Self::Durations),
            "book" => parse_booking(&tokens[1..], catalog).map(Self::Book),
            "cancel" => Ok(Self::Cancel),
            "status" => Ok(Self::Status),
            "reset" => Ok(Self::Reset),
            "settings" => Ok(Self::Settings),
            "quit" | "exit" => Ok(Self::Quit),
            other => Err(format!("unknown command '{other}' (try 'help')")),
        }
    }
}

/// Missing pieces stay `None` so the controller reports them like the
/// booking form would.
fn parse_booking(args: &[&str], catalog: &Catalog) -> Result<Selection, String> {
    let city = args.first().map(|c| c.to_string());

    let spot_id = match args.get(1) {
        Some(raw) => Some(SpotId(
            raw.trim_start_matches("P-")
                .parse::<u32>()
                .map_err(|_| format!("'{raw}' is not a spot number"))?,
        )),
        None => None,
    };

    let duration_minutes = match args.get(2) {
        Some(raw) => Some(
            raw.parse::<u32>()
                .map_err(|_| format!("'{raw}' is not a number of minutes"))?,
        ),
        None => None,
    };

    let mall = match args.get(3..) {
        Some(rest) if !rest.is_empty() => {
            let raw = rest.join(" ");
            let malls = city.as_deref().map(|c| catalog.malls_for(c)).unwrap_or(&[]);
            match raw.parse::<usize>() {
                Ok(n) if (1..=malls.len()).contains(&n) => Some(malls[n - 1].clone()),
                _ => Some(raw),
            }
        }
        _ => None,
    };

    Ok(Selection {
        city,
        mall,
        spot_id,
        duration_minutes,
    })
}

fn spot_line(spot: &Spot) -> String {
    format!("{} — {}م ({})", spot.name, spot.distance, spot.status.label())
}

pub fn render_snapshot(snapshot: &ParkingSnapshot) -> Vec<String> {
    let mut lines: Vec<String> = snapshot.spots.iter().map(spot_line).collect();
    if snapshot.free_count == 0 {
        lines.push(NO_AVAILABILITY.to_string());
    } else {
        lines.push(format!("{} / {} free", snapshot.free_count, snapshot.spots.len()));
    }

    match &snapshot.reservation {
        None => lines.push("لا يوجد حجز نشط حالياً.".to_string()),
        Some(view) => {
            let reservation = &view.reservation;
            let time = |t: chrono::DateTime<chrono::Utc>| {
                t.with_timezone(&Local).format("%H:%M:%S").to_string()
            };
            lines.push(format!("المدينة: {}", reservation.city));
            lines.push(format!("المول: {}", reservation.mall));
            lines.push(format!("رمز الموقف: {}", view.spot_name));
            lines.push(format!("المسافة من البوابة: {} متر", view.spot_distance));
            lines.push(format!("بداية الحجز: {}", time(reservation.start_time)));
            lines.push(format!("نهاية الحجز: {}", time(reservation.end_time)));
            lines.push("--- ticket ---".to_string());
            lines.extend(view.ticket.lines().map(str::to_string));
        }
    }
    lines
}

pub fn render_event(event: &ParkingEvent) -> Vec<String> {
    match event {
        ParkingEvent::StateChanged(snapshot) => render_snapshot(snapshot),
        ParkingEvent::Countdown(CountdownEvent::Tick { display, .. }) => {
            vec![format!("الوقت المتبقي: {display}")]
        }
        ParkingEvent::Countdown(CountdownEvent::Expired { .. }) => {
            vec!["⏰ انتهى الوقت. تم تحرير الموقف.".to_string()]
        }
        ParkingEvent::Notice(notice) => vec![format!("» {}", notice.message)],
    }
}

/// Prints events until every sender is gone.
pub async fn render_events(mut events: UnboundedReceiver<ParkingEvent>) {
    while let Some(event) = events.recv().await {
        debug!("rendering {}", event.name());
        for line in render_event(&event) {
            println!("{line}");
        }
    }
}

/// Reads commands from `input` until `quit` or end of input.
pub async fn run_repl<R>(state: &AppState, input: R) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();
    println!("{}", usage(&state.catalog));

    while let Some(line) = lines
        .next_line()
        .await
        .context("Failed to read command from input")?
    {
        if line.trim().is_empty() {
            continue;
        }

        let command = match ConsoleCommand::parse(&line, &state.catalog) {
            Ok(command) => command,
            Err(message) => {
                println!("{message}");
                continue;
            }
        };

        if !execute(state, command).await {
            break;
        }
    }

    Ok(())
}

/// Returns `false` once the user asks to leave.
async fn execute(state: &AppState, command: ConsoleCommand) -> bool {
    match command {
        ConsoleCommand::Help => println!("{}", usage(&state.catalog)),
        ConsoleCommand::Spots => {
            if let Ok(snapshot) = commands::get_parking_state(state).await {
                for line in render_snapshot(&snapshot) {
                    println!("{line}");
                }
            }
        }
        ConsoleCommand::Free => match commands::list_free_spots(state).await {
            Ok(free) if free.is_empty() => println!("{NO_AVAILABILITY}"),
            Ok(free) => {
                for spot in free {
                    println!("{}", spot.option_label());
                }
            }
            Err(message) => println!("{message}"),
        },
        ConsoleCommand::Cities => {
            if let Ok(cities) = commands::list_cities(state) {
                for city in cities {
                    println!("{} ({})", city.id, city.label);
                }
            }
        }
        ConsoleCommand::Malls(city) => match commands::list_malls(state, &city) {
            Ok(malls) => {
                for (index, mall) in malls.iter().enumerate() {
                    println!("{}. {mall}", index + 1);
                }
            }
            Err(message) => println!("{message}"),
        },
        ConsoleCommand::Durations => match commands::list_durations(state) {
            Ok(durations) => {
                let default = state.catalog.default_duration();
                for minutes in durations {
                    let marker = if minutes == default { " (default)" } else { "" };
                    println!("{minutes} min{marker}");
                }
            }
            Err(message) => println!("{message}"),
        },
        ConsoleCommand::Book(selection) => {
            // Rejections arrive as notices through the event stream.
            if let Err(message) = commands::book_spot(state, selection).await {
                debug!("book command failed: {message}");
            }
        }
        ConsoleCommand::Cancel => {
            if let Err(message) = commands::cancel_reservation(state).await {
                debug!("cancel command failed: {message}");
            }
        }
        ConsoleCommand::Status => match commands::get_parking_state(state).await {
            Ok(snapshot) => match snapshot.reservation {
                Some(view) => println!(
                    "{} @ {} / {}: {}",
                    view.spot_name,
                    view.reservation.city,
                    view.reservation.mall,
                    crate::booking::format_remaining(view.remaining_ms)
                        .unwrap_or_else(|| "0:00".to_string())
                ),
                None => println!("لا يوجد حجز نشط حالياً."),
            },
            Err(message) => println!("{message}"),
        },
        ConsoleCommand::Reset => {
            if let Err(message) = commands::regenerate_spots(state).await {
                println!("{message}");
            }
        }
        ConsoleCommand::Settings => match commands::get_settings(state) {
            Ok(settings) => match serde_json::to_string_pretty(&settings) {
                Ok(json) => println!("{json}"),
                Err(err) => println!("failed to render settings: {err}"),
            },
            Err(message) => println!("{message}"),
        },
        ConsoleCommand::Quit => return false,
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        booking::ParkingController, notice::NoticeKind, parking::SpotStatus,
        settings::ParkingSettings,
    };
    use std::sync::Arc;
    use tokio::sync::mpsc;

    fn parse(line: &str) -> Result<ConsoleCommand, String> {
        ConsoleCommand::parse(line, &Catalog::default())
    }

    #[test]
    fn parses_simple_commands() {
        assert_eq!(parse("spots"), Ok(ConsoleCommand::Spots));
        assert_eq!(parse("  CANCEL "), Ok(ConsoleCommand::Cancel));
        assert_eq!(parse("malls abha"), Ok(ConsoleCommand::Malls("abha".into())));
        assert!(parse("malls").is_err());
        assert!(parse("fly away").is_err());
        assert!(parse("").is_err());
    }

    #[test]
    fn usage_lists_reservation_lengths() {
        assert_eq!(parse("durations"), Ok(ConsoleCommand::Durations));
        assert_eq!(parse("settings"), Ok(ConsoleCommand::Settings));

        let help = usage(&Catalog::default());
        assert!(help.contains("durations"));
        assert!(help.ends_with("minutes: 15, 30, 60, 120, 180 (default 30)"));
    }

    #[test]
    fn book_resolves_mall_numbers_and_names() {
        let Ok(ConsoleCommand::Book(selection)) = parse("book khamis P-4 60 2") else {
            panic!("expected booking");
        };
        assert_eq!(selection.city.as_deref(), Some("khamis"));
        assert_eq!(selection.spot_id, Some(SpotId(4)));
        assert_eq!(selection.duration_minutes, Some(60));
        assert_eq!(selection.mall.as_deref(), Some("خميس أفنيو"));

        let Ok(ConsoleCommand::Book(selection)) = parse("book abha 3 30 لافندا بارك") else {
            panic!("expected booking");
        };
        assert_eq!(selection.mall.as_deref(), Some("لافندا بارك"));
    }

    #[test]
    fn book_keeps_missing_pieces_empty() {
        let Ok(ConsoleCommand::Book(selection)) = parse("book khamis 2") else {
            panic!("expected booking");
        };
        assert_eq!(selection.mall, None);
        assert_eq!(selection.duration_minutes, None);
        assert!(!selection.is_ready());

        assert!(parse("book khamis two").is_err());
    }

    #[test]
    fn renders_countdown_and_expiry() {
        let tick = ParkingEvent::Countdown(CountdownEvent::Tick {
            reservation_id: uuid::Uuid::nil(),
            remaining_ms: 125_000,
            display: "2:05".into(),
        });
        assert_eq!(render_event(&tick), vec!["الوقت المتبقي: 2:05"]);

        let expired = ParkingEvent::Countdown(CountdownEvent::Expired {
            reservation_id: uuid::Uuid::nil(),
            spot_id: SpotId(1),
        });
        assert_eq!(render_event(&expired), vec!["⏰ انتهى الوقت. تم تحرير الموقف."]);
    }

    #[test]
    fn renders_empty_lot() {
        let snapshot = ParkingSnapshot {
            state: crate::parking::SlotState::Empty,
            spots: vec![Spot::new(SpotId(1), 25, SpotStatus::Busy)],
            free_count: 0,
            reservation: None,
        };
        let lines = render_snapshot(&snapshot);
        assert_eq!(lines[0], "P-1 — 25م (مشغول)");
        assert_eq!(lines[1], NO_AVAILABILITY);
        assert_eq!(lines[2], "لا يوجد حجز نشط حالياً.");
    }

    fn app_state() -> (AppState, mpsc::UnboundedReceiver<ParkingEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let settings = ParkingSettings {
            free_ratio: 1.0,
            seed: Some(1),
            ..ParkingSettings::default()
        };
        let catalog = Arc::new(Catalog::default());
        let state = AppState {
            parking: ParkingController::new(&settings, catalog.clone(), Arc::new(tx)),
            catalog,
            settings,
        };
        (state, rx)
    }

    #[tokio::test(start_paused = true)]
    async fn durations_and_settings_come_from_app_state() {
        let (state, mut rx) = app_state();

        assert_eq!(
            commands::list_durations(&state),
            Ok(vec![15, 30, 60, 120, 180])
        );
        let settings = commands::get_settings(&state).unwrap();
        assert_eq!(settings.seed, Some(1));
        assert_eq!(settings.free_ratio, 1.0);

        let script: &[u8] = b"durations\nsettings\nhelp\nquit\n";
        run_repl(&state, script).await.unwrap();
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn repl_drives_the_controller() {
        let (state, mut rx) = app_state();

        let script: &[u8] = b"book khamis 3 30 1\nstatus\ncancel\ncancel\nquit\nbook khamis 4 30 1\n";
        run_repl(&state, script).await.unwrap();

        let mut kinds = Vec::new();
        while let Ok(event) = rx.try_recv() {
            if let ParkingEvent::Notice(notice) = event {
                kinds.push(notice.kind);
            }
        }
        assert_eq!(
            kinds,
            vec![NoticeKind::Booked, NoticeKind::Cancelled, NoticeKind::Rejected]
        );
        assert_eq!(state.parking.snapshot().await.free_count, 18);
    }
}
