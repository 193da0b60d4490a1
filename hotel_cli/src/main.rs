use std::{env, error::Error, fmt, process::ExitCode};

use chrono::NaiveDate;
use hotel::{
    domain::{Booking, BookingManager, RoomId},
    infrastructure::{JsonBookingRepository, JsonRoomRepository},
    HotelConfig,
};
use tracing::{error, Level};

const USAGE: &str = "usage: hotel_cli <find|book|occupied> <start YYYY-MM-DD> <end YYYY-MM-DD>";

#[tokio::main]
async fn main() -> ExitCode {
    let config = match HotelConfig::load() {
        Ok(config) => {
            tracing_subscriber::fmt()
                .with_max_level(Level::from(&config.logger.level))
                .with_writer(std::io::stderr)
                .init();
            config
        }
        Err(error) => {
            tracing_subscriber::fmt().with_writer(std::io::stderr).init();
            error!("configuration error: {}", error);
            return ExitCode::FAILURE;
        }
    };
    let command = match Command::parse(env::args().skip(1)) {
        Ok(command) => command,
        Err(error) => {
            eprintln!("{}\n{}", error, USAGE);
            return ExitCode::from(2);
        }
    };
    match run(&config, command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            error!("application error: {}", error);
            ExitCode::FAILURE
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Find { start: NaiveDate, end: NaiveDate },
    Book { start: NaiveDate, end: NaiveDate },
    Occupied { start: NaiveDate, end: NaiveDate },
}

#[derive(Debug)]
struct UsageError(String);

impl Error for UsageError {}

impl fmt::Display for UsageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Command {
    fn parse<I: IntoIterator<Item = String>>(args: I) -> Result<Self, UsageError> {
        let args = args.into_iter().collect::<Vec<_>>();
        let [name, start, end] = args.as_slice() else {
            return Err(UsageError(format!("expected 3 arguments, got {}", args.len())));
        };
        let start = parse_date(start)?;
        let end = parse_date(end)?;
        match name.as_str() {
            "find" => Ok(Command::Find { start, end }),
            "book" => Ok(Command::Book { start, end }),
            "occupied" => Ok(Command::Occupied { start, end }),
            other => Err(UsageError(format!("unknown command: {}", other))),
        }
    }
}

fn parse_date(value: &str) -> Result<NaiveDate, UsageError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| UsageError(format!("invalid date {:?}: {}", value, e)))
}

async fn run(config: &HotelConfig, command: Command) -> Result<(), Box<dyn Error>> {
    let manager = BookingManager::new(
        JsonBookingRepository::new(&config.storage.bookings),
        JsonRoomRepository::new(&config.storage.rooms),
    );
    match command {
        Command::Find { start, end } => {
            let room = manager.find_available_room(start, end).await?;
            println!("{}", room.unwrap_or(RoomId::UNAVAILABLE));
        }
        Command::Book { start, end } => {
            let mut booking = Booking::request(start, end);
            if !manager.create_booking(&mut booking).await? {
                println!("no room available");
                return Ok(());
            }
            let room_id = booking.room_id().unwrap_or(RoomId::UNAVAILABLE);
            match manager.find_room(room_id).await? {
                Some(room) => println!("booked room {}: {}", room_id, room.description()),
                None => println!("booked room {}", room_id),
            }
        }
        Command::Occupied { start, end } => {
            for date in manager.fully_occupied_dates(start, end).await? {
                println!("{}", date);
            }
        }
    }
    Ok(())
}
