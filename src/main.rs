use std::{env, fs, process};

use env_logger::Env;
use reqwest::Client;

use tripdraft::models::itinerary::ItineraryDocument;
use tripdraft::models::regeneration::RegenerationRequest;
use tripdraft::services::chat_service::HttpChatClient;
use tripdraft::services::regeneration_service::RegenerationService;

/*
    tripdraft <itinerary.json> <day> [tag ...]

    Reads an itinerary document, asks the AI planner to regenerate one day
    (optionally steered by free-text improvement tags) and prints the merged
    document to stdout.
*/
#[tokio::main]
async fn main() {
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    if cfg!(debug_assertions) {
        dotenv::dotenv().ok();
    }

    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        eprintln!("Usage: {} <itinerary.json> <day> [tag ...]", args[0]);
        process::exit(2);
    }

    let raw = match fs::read_to_string(&args[1]) {
        Ok(raw) => raw,
        Err(err) => {
            eprintln!("Failed to read itinerary {}: {}", args[1], err);
            process::exit(2);
        }
    };

    let document: ItineraryDocument = match serde_json::from_str(&raw) {
        Ok(document) => document,
        Err(err) => {
            eprintln!("Failed to parse itinerary {}: {}", args[1], err);
            process::exit(2);
        }
    };

    let target_day: u32 = match args[2].parse() {
        Ok(day) => day,
        Err(_) => {
            eprintln!("Invalid day number: {}", args[2]);
            process::exit(2);
        }
    };

    let chat = match HttpChatClient::from_env(Client::new()) {
        Ok(chat) => chat,
        Err(err) => {
            eprintln!("{}", err);
            process::exit(2);
        }
    };

    let request = RegenerationRequest {
        target_day,
        tags: args[3..].to_vec(),
        source_document: document,
    };

    let service = RegenerationService::new(chat);

    match service.run(&request, |progress| println!("{}", progress)).await {
        Ok(updated) => match serde_json::to_string_pretty(&updated) {
            Ok(json) => println!("{}", json),
            Err(err) => {
                eprintln!("Failed to serialize updated itinerary: {}", err);
                process::exit(1);
            }
        },
        Err(err) => {
            eprintln!("Regeneration failed: {}", err);
            process::exit(1);
        }
    }
}
