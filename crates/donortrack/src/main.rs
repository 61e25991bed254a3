//! `donortrack` - CLI for donortrack
//!
//! Manage donors, donations and the organization record, browse donors
//! interactively, and write year-end thank-you letters.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use anyhow::{bail, Context};
use chrono::{Datelike, Local};
use clap::Parser;

use donortrack::cli::output::{donation_line, donor_details, donor_summary, organization_details};
use donortrack::cli::{
    run_browse, Cli, Command, ConfigCommand, DonationCommand, DonorCommand, LettersCommand,
    OrgCommand, SearchCommand,
};
use donortrack::forms::validate_letter_year;
use donortrack::model::DATE_FORMAT;
use donortrack::{
    init_logging, Config, Controller, DonationForm, DonorForm, Error, LetterGenerator,
    OrganizationForm, Storage,
};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbosity());

    let config = Config::load_from(cli.config.clone())?;

    match cli.command {
        Command::Config(config_cmd) => handle_config(&config, config_cmd),
        command => {
            let db_path = cli.database.unwrap_or_else(|| config.database_path());
            let storage = Storage::open(&db_path)
                .with_context(|| format!("opening {}", db_path.display()))?;
            run(&config, &storage, command)
        }
    }
}

fn run(config: &Config, storage: &Storage, command: Command) -> anyhow::Result<()> {
    let mut controller = Controller::new(storage);

    match command {
        Command::Donor(cmd) => handle_donor(&mut controller, cmd),
        Command::Donation(cmd) => handle_donation(&mut controller, cmd),
        Command::Search(cmd) => handle_search(&controller, &cmd),
        Command::Org(cmd) => handle_org(&controller, cmd),
        Command::Letters(cmd) => handle_letters(config, &controller, cmd),
        Command::Browse => {
            let stdin = std::io::stdin();
            run_browse(&mut controller, stdin.lock(), std::io::stdout().lock())?;
            Ok(())
        }
        Command::Status(cmd) => handle_status(storage, cmd.json),
        Command::Config(cmd) => handle_config(config, cmd),
    }
}

fn handle_donor(controller: &mut Controller<'_>, cmd: DonorCommand) -> anyhow::Result<()> {
    match cmd {
        DonorCommand::Add(fields) => {
            let mut form = DonorForm::default();
            fields.apply_to(&mut form);
            let id = controller.add_donor(&form)?;
            println!("Added donor {id}.");
        }
        DonorCommand::Edit { id, fields } => {
            controller.load_donor(id)?;
            let mut form = controller
                .loaded()
                .map(|loaded| DonorForm::from(&loaded.donor))
                .unwrap_or_default();
            fields.apply_to(&mut form);
            controller.update_donor(id, &form)?;
            println!("Updated donor {id}.");
        }
        DonorCommand::Delete { id, yes } => {
            controller.load_donor(id)?;
            if yes {
                controller.delete_donor(id)?;
                println!("Deleted donor {id} and all of its donations.");
            } else if let Some(loaded) = controller.loaded() {
                println!(
                    "This will delete {} and {} donation(s).",
                    loaded.donor.fields.full_name(),
                    loaded.donations.len()
                );
                println!("Use --yes to confirm.");
            }
        }
        DonorCommand::Show { id, json } => {
            controller.load_donor(id)?;
            if let Some(loaded) = controller.loaded() {
                if json {
                    println!("{}", serde_json::to_string_pretty(loaded)?);
                } else {
                    print!("{}", donor_details(loaded));
                }
            }
        }
    }
    Ok(())
}

fn handle_donation(controller: &mut Controller<'_>, cmd: DonationCommand) -> anyhow::Result<()> {
    match cmd {
        DonationCommand::Add { donor_id, fields } => {
            controller.load_donor(donor_id)?;
            let mut form = DonationForm::for_donor(donor_id);
            form.date = Local::now().date_naive().format(DATE_FORMAT).to_string();
            fields.apply_to(&mut form);
            let id = controller.add_donation(&form)?;
            println!("Added donation {id} for donor {donor_id}.");
        }
        DonationCommand::Edit {
            id,
            donor_id,
            fields,
        } => {
            let donation = controller
                .storage()
                .get_donation(id)?
                .ok_or(Error::DonationNotFound(id))?;
            let mut form = DonationForm::from(&donation);
            if let Some(donor_id) = donor_id {
                form.donor_id = donor_id.to_string();
            }
            fields.apply_to(&mut form);
            controller.load_donor(donation.fields.donor_id)?;
            controller.update_donation(id, &form)?;
            println!("Updated donation {id}.");
        }
        DonationCommand::Delete { id, yes } => {
            let donation = controller
                .storage()
                .get_donation(id)?
                .ok_or(Error::DonationNotFound(id))?;
            if yes {
                controller.load_donor(donation.fields.donor_id)?;
                controller.delete_donation(id)?;
                println!("Deleted donation {id}.");
            } else {
                println!("This will delete donation:");
                println!("{}", donation_line(&donation));
                println!("Use --yes to confirm.");
            }
        }
        DonationCommand::List { donor_id, json } => {
            controller.load_donor(donor_id)?;
            if let Some(loaded) = controller.loaded() {
                if json {
                    println!("{}", serde_json::to_string_pretty(&loaded.donations)?);
                } else if loaded.donations.is_empty() {
                    println!("No donations recorded for donor {donor_id}.");
                } else {
                    for donation in &loaded.donations {
                        println!("{}", donation_line(donation));
                    }
                }
            }
        }
    }
    Ok(())
}

fn handle_search(controller: &Controller<'_>, cmd: &SearchCommand) -> anyhow::Result<()> {
    let term = cmd.term.as_deref().unwrap_or_default();
    let donors = controller.search(term, cmd.all)?;

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&donors)?);
    } else if donors.is_empty() {
        println!("No donors found.");
    } else {
        for donor in &donors {
            println!("{}", donor_summary(donor));
        }
    }
    Ok(())
}

fn handle_org(controller: &Controller<'_>, cmd: OrgCommand) -> anyhow::Result<()> {
    match cmd {
        OrgCommand::Show { json } => {
            let org = controller.organization()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&org)?);
            } else {
                print!("{}", organization_details(org.as_ref()));
            }
        }
        OrgCommand::Set(fields) => {
            let mut form = controller
                .organization()?
                .map(|org| OrganizationForm::from_organization(&org))
                .unwrap_or_default();
            fields.apply_to(&mut form);
            let org = controller.set_organization(&form)?;
            println!("Saved organization details:");
            print!("{}", organization_details(Some(&org)));
        }
    }
    Ok(())
}

fn handle_letters(
    config: &Config,
    controller: &Controller<'_>,
    cmd: LettersCommand,
) -> anyhow::Result<()> {
    let today = Local::now().date_naive();
    let (earliest, latest) = config.letter_year_bounds(today.year());
    let year = validate_letter_year(cmd.year.unwrap_or(today.year()), earliest, latest)?;
    let output_dir = cmd
        .output_dir
        .unwrap_or_else(|| config.letters.output_dir.clone());

    let report = controller.generate_letters(&LetterGenerator::new(&output_dir), year, today)?;

    println!(
        "Wrote {} letter(s) for {year} to {}.",
        report.written.len(),
        output_dir.display()
    );
    for failure in &report.failures {
        eprintln!(
            "Could not write {} (donor {}): {}",
            failure.path.display(),
            failure.donor_id,
            failure.message
        );
    }
    if !report.is_complete() {
        bail!("{} letter(s) could not be written", report.failures.len());
    }
    Ok(())
}

fn handle_status(storage: &Storage, json: bool) -> anyhow::Result<()> {
    let stats = storage.stats()?;
    if json {
        let status = serde_json::json!({
            "database_path": storage.path(),
            "stats": stats,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!("donortrack status");
        println!("-----------------");
        println!("Database:      {}", storage.path().display());
        println!("Size:          {} bytes", stats.db_size_bytes);
        println!("Donors:        {}", stats.donors);
        println!("Donations:     {}", stats.donations);
        println!(
            "Organization:  {}",
            if stats.organization_set { "set" } else { "not set" }
        );
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Database path:  {}", config.database_path().display());
                println!();
                println!("[Letters]");
                println!("  Output dir:     {}", config.letters.output_dir.display());
                println!("  Earliest year:  {}", config.letters.min_year);
                println!("  Years ahead:    {}", config.letters.years_ahead);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => bail!("configuration error: {e}"),
            }
        }
    }
    Ok(())
}
