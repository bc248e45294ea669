//! Standup CLI - daily meeting orchestration and impediment tracking.

use anyhow::Result;
use chrono::{NaiveDate, NaiveTime};
use clap::{Parser, Subcommand};
use standup_core::{
    DailyMeeting, ImpedimentState, MeetingState, PersonId, Priority, ResponseField, SprintId,
};
use standup_impediment::ImpedimentService;
use standup_meeting::MeetingService;
use standup_report::{BasicSprintReporter, SprintReporter};
use standup_storage::{JsonStore, MeetingFilter};
use tracing::Level;

#[derive(Parser)]
#[command(name = "standup")]
#[command(about = "Daily meeting orchestration and impediment tracking", long_about = None)]
struct Cli {
    /// Data directory
    #[arg(long, default_value = ".standup")]
    data_dir: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Open a daily meeting for a sprint date
    Open {
        /// Sprint ID
        sprint: String,
        /// Meeting date (YYYY-MM-DD)
        date: String,
        /// Planned time box in minutes
        #[arg(long)]
        planned: Option<u32>,
    },
    /// Start a meeting
    Start {
        /// Meeting ID
        id: String,
        /// Start time (HH:MM)
        time: String,
    },
    /// Finish a meeting
    Finish {
        /// Meeting ID
        id: String,
        /// End time (HH:MM)
        time: String,
    },
    /// Show meeting details
    Show {
        /// Meeting ID
        id: String,
    },
    /// List a sprint's meetings
    List {
        /// Sprint ID
        sprint: String,
        /// Filter by state (pending | inprogress | completed)
        #[arg(long)]
        state: Option<String>,
    },
    /// Record attendance for a participant
    Attend {
        /// Meeting ID
        meeting: String,
        /// Person ID
        person: String,
        /// Mark the participant absent
        #[arg(long)]
        absent: bool,
        /// Absence reason
        #[arg(long)]
        reason: Option<String>,
    },
    /// Record a standup answer for a participant
    Answer {
        /// Meeting ID
        meeting: String,
        /// Person ID
        person: String,
        /// Field (yesterday | today | reason)
        field: String,
        /// Answer text
        text: String,
    },
    /// Replace the facilitator notes of a meeting
    Note {
        /// Meeting ID
        meeting: String,
        /// Notes text
        text: String,
    },
    /// Report an impediment
    Report {
        /// What is blocking progress
        description: String,
        /// Priority (high | medium | low)
        #[arg(long, default_value = "medium")]
        priority: String,
        /// Reporting person ID
        #[arg(long)]
        reporter: String,
        /// Assigned resolver person ID
        #[arg(long)]
        resolver: Option<String>,
        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<String>,
        /// Meeting the blocker was raised in
        #[arg(long)]
        meeting: Option<String>,
    },
    /// Start work on an impediment
    Advance {
        /// Impediment ID
        id: String,
    },
    /// Resolve an impediment
    Resolve {
        /// Impediment ID
        id: String,
        /// How it was resolved
        resolution: String,
    },
    /// Assign a new resolver to an impediment
    Reassign {
        /// Impediment ID
        id: String,
        /// Resolver person ID
        resolver: String,
    },
    /// List impediments
    Impediments {
        /// Filter by state (open | inprogress | resolved)
        #[arg(long)]
        state: Option<String>,
    },
    /// Show the sprint rollup
    Summary {
        /// Sprint ID
        sprint: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    let cli = Cli::parse();

    let store = JsonStore::new(&cli.data_dir).await?;

    match cli.command {
        Commands::Open { sprint, date, planned } => {
            let service = MeetingService::new(store);
            let meeting = service
                .open_meeting(SprintId::new(sprint), parse_date(&date)?, planned)
                .await?;
            println!("Opened meeting {} ({} participants)", meeting.id, meeting.responses.len());
        }
        Commands::Start { id, time } => {
            let service = MeetingService::new(store);
            let meeting = service.start_meeting(id.parse()?, parse_time(&time)?).await?;
            println!("Meeting {} is now {}", meeting.id, meeting.state().as_str());
        }
        Commands::Finish { id, time } => {
            let service = MeetingService::new(store);
            let meeting = service.finish_meeting(id.parse()?, parse_time(&time)?).await?;
            println!(
                "Meeting {} completed in {} minutes",
                meeting.id,
                meeting.duration_minutes.unwrap_or_default()
            );
        }
        Commands::Show { id } => {
            let service = MeetingService::new(store);
            let meeting = service.get_meeting(id.parse()?).await?;
            print_meeting(&meeting);
        }
        Commands::List { sprint, state } => {
            let service = MeetingService::new(store);
            let filter = MeetingFilter {
                state: state.as_deref().and_then(parse_meeting_state),
                ..Default::default()
            };
            let meetings = service.list_meetings(&SprintId::new(sprint), &filter).await?;

            println!("Meetings ({})", meetings.len());
            for meeting in meetings {
                println!(
                    "  {} | {} | {} | {}/{} attending",
                    meeting.id,
                    meeting.date,
                    meeting.state().as_str(),
                    meeting.attending_count(),
                    meeting.responses.len(),
                );
            }
        }
        Commands::Attend { meeting, person, absent, reason } => {
            let service = MeetingService::new(store);
            let updated = service
                .set_attendance(meeting.parse()?, &PersonId::new(person), !absent, reason)
                .await?;
            println!(
                "Attendance recorded ({}/{} attending)",
                updated.attending_count(),
                updated.responses.len()
            );
        }
        Commands::Answer { meeting, person, field, text } => {
            let service = MeetingService::new(store);
            let field = parse_field(&field)
                .ok_or_else(|| anyhow::anyhow!("unknown field (yesterday | today | reason)"))?;
            service
                .update_field(meeting.parse()?, &PersonId::new(person), field, text)
                .await?;
            println!("Answer recorded");
        }
        Commands::Note { meeting, text } => {
            let service = MeetingService::new(store);
            service.update_notes(meeting.parse()?, text).await?;
            println!("Notes updated");
        }
        Commands::Report { description, priority, reporter, resolver, due, meeting } => {
            let priority = parse_priority(&priority)
                .ok_or_else(|| anyhow::anyhow!("unknown priority (high | medium | low)"))?;
            let due = due.as_deref().map(parse_date).transpose()?;

            // The impediment is tracked globally; attaching it to the
            // meeting that raised it is a separate write.
            let impediment = {
                let service = ImpedimentService::new(JsonStore::new(&cli.data_dir).await?);
                service
                    .report(
                        description,
                        priority,
                        PersonId::new(reporter),
                        resolver.map(PersonId::new),
                        due,
                    )
                    .await?
            };
            println!("Reported impediment {}", impediment.id);

            if let Some(meeting_id) = meeting {
                let service = MeetingService::new(store);
                service.attach_impediment(meeting_id.parse()?, impediment.id).await?;
                println!("Attached to meeting {}", meeting_id);
            }
        }
        Commands::Advance { id } => {
            let service = ImpedimentService::new(store);
            let impediment = service.advance(id.parse()?).await?;
            println!("Impediment {} is now {}", impediment.id, impediment.state.as_str());
        }
        Commands::Resolve { id, resolution } => {
            let service = ImpedimentService::new(store);
            let impediment = service.resolve(id.parse()?, resolution).await?;
            println!("Impediment {} resolved", impediment.id);
        }
        Commands::Reassign { id, resolver } => {
            let service = ImpedimentService::new(store);
            let impediment = service.reassign(id.parse()?, PersonId::new(resolver)).await?;
            println!(
                "Impediment {} assigned to {}",
                impediment.id,
                impediment.resolver.map(|p| p.to_string()).unwrap_or_default()
            );
        }
        Commands::Impediments { state } => {
            let service = ImpedimentService::new(store);
            let impediments = match state.as_deref().and_then(parse_impediment_state) {
                Some(state) => service.list_by_state(state).await?,
                None => service.list().await?,
            };

            println!("Impediments ({})", impediments.len());
            for impediment in impediments {
                println!(
                    "  {} | {} | {} | {} | {}",
                    impediment.id,
                    impediment.state.as_str(),
                    impediment.priority.as_str(),
                    impediment.reported_on,
                    impediment.description,
                );
            }
        }
        Commands::Summary { sprint } => {
            let reporter = BasicSprintReporter::new(store);
            let summary = reporter.sprint_summary(&SprintId::new(sprint)).await?;

            println!("Sprint summary");
            println!("  Meetings:        {}", summary.total_meetings);
            println!("  Completed:       {}", summary.completed_meetings);
            println!("  Avg attendance:  {}%", summary.average_attendance_pct);
            println!("  Open blockers:   {}", summary.open_impediments);
            if let Some(latest) = summary.latest_meeting {
                println!("  Latest meeting:  {}", latest);
            }
        }
    }

    Ok(())
}

fn print_meeting(meeting: &DailyMeeting) {
    println!("Meeting: {}", meeting.id);
    println!("  Sprint: {}", meeting.sprint_id);
    println!("  Date: {}", meeting.date);
    println!("  State: {}", meeting.state().as_str());
    if let Some(start) = meeting.start_time {
        println!("  Started: {}", start);
    }
    if let Some(end) = meeting.end_time {
        println!("  Finished: {}", end);
    }
    if let Some(planned) = meeting.planned_minutes {
        println!("  Planned: {} min", planned);
    }
    if let Some(duration) = meeting.duration_minutes {
        println!("  Duration: {} min", duration);
    }
    if !meeting.notes.is_empty() {
        println!("  Notes: {}", meeting.notes);
    }
    println!("  Participants:");
    for response in &meeting.responses {
        let mark = if response.attended { "present" } else { "absent" };
        println!("    {} ({}) - {}", response.display_name, response.person_id, mark);
        if !response.attended && !response.absence_reason.is_empty() {
            println!("      reason: {}", response.absence_reason);
        }
        if !response.yesterday.is_empty() {
            println!("      yesterday: {}", response.yesterday);
        }
        if !response.today.is_empty() {
            println!("      today: {}", response.today);
        }
        if let Some(impediment) = &response.impediment {
            println!("      blocker: {}", impediment.description);
        }
    }
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| anyhow::anyhow!("invalid date (expected YYYY-MM-DD): {}", s))
}

fn parse_time(s: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(s, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .map_err(|_| anyhow::anyhow!("invalid time (expected HH:MM): {}", s))
}

fn parse_field(s: &str) -> Option<ResponseField> {
    match s.to_lowercase().as_str() {
        "yesterday" => Some(ResponseField::Yesterday),
        "today" => Some(ResponseField::Today),
        "reason" => Some(ResponseField::AbsenceReason),
        _ => None,
    }
}

fn parse_priority(s: &str) -> Option<Priority> {
    match s.to_lowercase().as_str() {
        "high" => Some(Priority::High),
        "medium" => Some(Priority::Medium),
        "low" => Some(Priority::Low),
        _ => None,
    }
}

fn parse_meeting_state(s: &str) -> Option<MeetingState> {
    match s.to_lowercase().as_str() {
        "pending" => Some(MeetingState::Pending),
        "inprogress" => Some(MeetingState::InProgress),
        "completed" => Some(MeetingState::Completed),
        _ => None,
    }
}

fn parse_impediment_state(s: &str) -> Option<ImpedimentState> {
    match s.to_lowercase().as_str() {
        "open" => Some(ImpedimentState::Open),
        "inprogress" => Some(ImpedimentState::InProgress),
        "resolved" => Some(ImpedimentState::Resolved),
        _ => None,
    }
}
