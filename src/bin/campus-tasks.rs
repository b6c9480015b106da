//! A command-line front end to the student dashboard data.
//!
//! Set the RUST_LOG environment variable to display more info.

use std::error::Error;
use std::io::Write;
use std::path::Path;

use chrono::NaiveDate;

use campus_tasks::agenda;
use campus_tasks::client::Client;
use campus_tasks::config::UPCOMING_DEADLINES_COUNT;
use campus_tasks::filter::TaskFilter;
use campus_tasks::progress::progress_report;
use campus_tasks::storage::FileStorage;
use campus_tasks::task::NewTask;
use campus_tasks::utils::{print_agenda_entry, print_progress, print_task_list};
use campus_tasks::{Priority, TaskCategory, TaskId, TaskTracker};

const USAGE: &str = "Usage:
    campus-tasks list [--course NAME] [--pending | --done] [--priority high|medium|low]
    campus-tasks toggle TASK_ID
    campus-tasks add COURSE TITLE YYYY-MM-DD [assignment|exam|quiz|project] [high|medium|low]
    campus-tasks delete TASK_ID
    campus-tasks progress
    campus-tasks agenda [month|week]
    campus-tasks chat PROMPT...
    campus-tasks syllabus FILE.pdf [--save]";


#[tokio::main]
async fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if let Err(err) = run(&args).await {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

async fn run(args: &[String]) -> Result<(), Box<dyn Error>> {
    let command = match args.first() {
        None => {
            println!("{}", USAGE);
            return Ok(());
        },
        Some(c) => c.as_str(),
    };
    let rest = &args[1..];
    let client = Client::from_config()?;

    match command {
        "chat" => return chat(&client, rest).await,
        "syllabus" => return syllabus(&client, rest).await,
        _ => (),
    }

    // The task list is still usable without the remote data: only custom tasks are displayed then
    let mut tracker = TaskTracker::new(Vec::new(), FileStorage::from_config());
    if tracker.refresh(&client).await == false {
        log::warn!("Could not load student data. Only custom tasks are available");
    }
    let today = tracker.today();

    match command {
        "list" => {
            let filter = parse_filter(rest)?;
            print_task_list(tracker.filtered(&filter), today);
        },
        "toggle" => {
            let id = TaskId::from(required(rest, 0, "TASK_ID")?);
            match tracker.toggle_completion(&id) {
                None => return Err(format!("No task with id {}", id).into()),
                Some(true) => println!("Completed {}", id),
                Some(false) => println!("Reopened {}", id),
            }
        },
        "add" => {
            let date = NaiveDate::parse_from_str(required(rest, 2, "YYYY-MM-DD")?, "%Y-%m-%d")?;
            let mut new_task = NewTask::new(required(rest, 0, "COURSE")?.to_string(), required(rest, 1, "TITLE")?.to_string(), date);
            if let Some(category) = rest.get(3) {
                let category = TaskCategory::from_name(category)
                    .ok_or_else(|| format!("Invalid task type '{}'", category))?;
                new_task = new_task.with_category(category);
            }
            if let Some(priority) = rest.get(4) {
                new_task = new_task.with_priority(priority.parse()?);
            }
            let id = tracker.add_custom_task(new_task)?;
            println!("Added {}", id);
        },
        "delete" => {
            let id = TaskId::from(required(rest, 0, "TASK_ID")?);
            tracker.delete_custom_task(&id)?;
            println!("Deleted {}", id);
        },
        "progress" => {
            print_progress(&progress_report(tracker.courses(), tracker.state()));
        },
        "agenda" => {
            let entries = agenda::all_entries(tracker.courses());
            match rest.first().map(|s| s.as_str()) {
                Some("month") => {
                    for month in agenda::group_by_month(&entries) {
                        println!("{}", month.label());
                        month.entries.iter().for_each(print_agenda_entry);
                    }
                },
                Some("week") => {
                    for week in agenda::group_by_week(&entries) {
                        println!("{}", week.label());
                        week.entries.iter().for_each(print_agenda_entry);
                    }
                },
                _ => {
                    println!("Upcoming deadlines");
                    agenda::upcoming_deadlines(&entries, today, UPCOMING_DEADLINES_COUNT).iter().for_each(print_agenda_entry);
                    let (day, next) = agenda::next_working_day_entries(&entries, today);
                    println!("{}", day.format("%A, %b %-d"));
                    next.iter().for_each(print_agenda_entry);
                },
            }
        },
        other => {
            return Err(format!("Unknown command '{}'\n{}", other, USAGE).into());
        },
    }
    Ok(())
}

fn required<'a>(args: &'a [String], index: usize, name: &str) -> Result<&'a str, Box<dyn Error>> {
    match args.get(index) {
        Some(arg) => Ok(arg),
        None => Err(format!("Missing {}\n{}", name, USAGE).into()),
    }
}

fn parse_filter(args: &[String]) -> Result<TaskFilter, Box<dyn Error>> {
    let mut filter = TaskFilter::new();
    let mut args = args.iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--course" => {
                let course = args.next().ok_or("Missing course name")?;
                filter.course = Some(course.clone());
            },
            "--priority" => {
                let priority: Priority = args.next().ok_or("Missing priority")?.parse()?;
                filter.priority = Some(priority);
            },
            "--pending" => filter.completed = Some(false),
            "--done" => filter.completed = Some(true),
            other => return Err(format!("Unknown option '{}'", other).into()),
        }
    }
    Ok(filter)
}

async fn chat(client: &Client, args: &[String]) -> Result<(), Box<dyn Error>> {
    if args.is_empty() {
        return Err(format!("Missing PROMPT\n{}", USAGE).into());
    }
    let prompt = args.join(" ");
    client.chat(&prompt, |chunk| {
        print!("{}", chunk);
        let _ = std::io::stdout().flush();
    }).await?;
    println!();
    Ok(())
}

async fn syllabus(client: &Client, args: &[String]) -> Result<(), Box<dyn Error>> {
    let path = Path::new(required(args, 0, "FILE.pdf")?);
    let file_name = path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "syllabus.pdf".to_string());
    let pdf = std::fs::read(path)?;

    let data = client.analyze_syllabus(&file_name, pdf).await?;
    println!("{}", serde_json::to_string_pretty(&data)?);

    if args.iter().any(|a| a == "--save") {
        client.save_syllabus_data(&data).await?;
        println!("Saved. The course will show up the next time student data is fetched.");
    }
    Ok(())
}
