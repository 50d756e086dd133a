//! One function per demonstrated pipeline
//!
//! Every scenario returns the lines it produced, in order, after logging them.

use anyhow::{Context, Result};
use reactive_examples::rx::{Flux, Mono, Scheduler};
use reactive_examples::{Named, Person, PersonCommand};
use tokio::sync::{mpsc, oneshot};
use tracing::info;

use crate::config::DemoConfig;

pub struct Scenarios {
    config: DemoConfig,
    scheduler: Scheduler,
}

impl Scenarios {
    pub fn new(config: DemoConfig) -> Result<Self> {
        let scheduler =
            Scheduler::new(&config.scheduler).context("failed to start the scenario scheduler")?;
        Ok(Self { config, scheduler })
    }

    pub fn config(&self) -> &DemoConfig {
        &self.config
    }

    /// Block on a Mono holding the first cast member
    pub fn mono(&self) -> Result<Vec<String>> {
        let person = Mono::just(self.member(0)?.clone())
            .subscribe_on(self.scheduler.clone())
            .block()?;
        Ok(vec![log_line(person.describe())])
    }

    /// Map the second cast member into a command, then block
    pub fn mono_transform(&self) -> Result<Vec<String>> {
        let command = Mono::just(self.member(1)?.clone())
            .map(PersonCommand::from)
            .subscribe_on(self.scheduler.clone())
            .block()?;
        Ok(vec![log_line(command.describe())])
    }

    /// Filter the third cast member by first name (ignoring case), then block
    ///
    /// A rejected value is the expected outcome and is reported as a line.
    pub fn mono_filter(&self, first_name: &str) -> Result<Vec<String>> {
        let wanted = first_name.to_string();
        let result = Mono::just(self.member(2)?.clone())
            .filter(move |person| person.first_name().eq_ignore_ascii_case(&wanted))
            .name(first_name)
            .subscribe_on(self.scheduler.clone())
            .block();

        match result {
            Ok(person) => Ok(vec![log_line(person.describe())]),
            Err(err) if err.is_absent() => Ok(vec![log_line(err.to_string())]),
            Err(err) => Err(err.into()),
        }
    }

    /// Subscribe to the whole cast
    pub fn flux(&self) -> Result<Vec<String>> {
        self.run(self.people())
    }

    /// Subscribe to the cast members with exactly this first name
    pub fn flux_filter(&self, first_name: &str) -> Result<Vec<String>> {
        let wanted = first_name.to_string();
        self.run(self.people().filter(move |person| person.first_name() == wanted))
    }

    /// Subscribe to the cast with every member delayed
    pub fn flux_delay(&self) -> Result<Vec<String>> {
        self.run(self.people().delay_elements(self.config.delay()))
    }

    /// Delay the cast, then keep first names containing `needle`
    pub fn flux_filter_delay(&self, needle: &str) -> Result<Vec<String>> {
        let needle = needle.to_string();
        self.run(
            self.people()
                .delay_elements(self.config.delay())
                .filter(move |person| person.first_name().contains(needle.as_str())),
        )
    }

    /// Every scenario with its default arguments
    pub fn all(&self) -> Result<Vec<String>> {
        let mut lines = Vec::new();
        lines.extend(self.mono()?);
        lines.extend(self.mono_transform()?);
        lines.extend(self.mono_filter("foo")?);
        lines.extend(self.flux()?);
        lines.extend(self.flux_filter("Fiona")?);
        lines.extend(self.flux_delay()?);
        lines.extend(self.flux_filter_delay("i")?);
        Ok(lines)
    }

    fn member(&self, index: usize) -> Result<&Person> {
        self.config
            .cast
            .get(index)
            .with_context(|| format!("cast needs at least {} people", index + 1))
    }

    fn people(&self) -> Flux<Person> {
        Flux::just(self.config.cast.clone()).subscribe_on(self.scheduler.clone())
    }

    /// Subscribe and wait for the completion signal
    fn run(&self, flux: Flux<Person>) -> Result<Vec<String>> {
        let (line_tx, mut line_rx) = mpsc::unbounded_channel();
        let (done_tx, done_rx) = oneshot::channel();

        let _subscription = flux.subscribe(
            move |person: Person| {
                let _ = line_tx.send(log_line(person.describe()));
            },
            move || {
                let _ = done_tx.send(());
            },
        );

        done_rx
            .blocking_recv()
            .context("flux terminated without completing")?;

        let mut lines = Vec::new();
        while let Ok(line) = line_rx.try_recv() {
            lines.push(line);
        }
        Ok(lines)
    }
}

fn log_line(line: String) -> String {
    info!("{}", line);
    line
}
