// Fixed-tick host loop driving the input FIFO into the console.

use std::cell::Cell;
use std::rc::Rc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Result;
use ddnet_config::ClientConfig;
use ddnet_console::Console;
use ddnet_fifo::Fifo;
use ddnet_types::ConfigFlags;
use log::info;

#[derive(Debug, Default)]
struct Counters {
    ticks: Cell<u64>,
    fifo_lines: Cell<u64>,
}

pub struct Host {
    console: Console,
    fifo: Fifo,
    quit: Rc<Cell<bool>>,
    counters: Rc<Counters>,
    tick_interval: Duration,
}

impl Host {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let mut console = Console::with_builtins(ConfigFlags::CLIENT)?;
        let quit = Rc::new(Cell::new(false));
        let counters = Rc::new(Counters::default());

        let quit_flag = Rc::clone(&quit);
        console.register(
            "quit",
            "",
            ConfigFlags::CLIENT | ConfigFlags::SERVER,
            "Quit",
            Box::new(move |_, _| {
                quit_flag.set(true);
                Ok(())
            }),
        )?;

        let status_counters = Rc::clone(&counters);
        console.register(
            "status",
            "",
            ConfigFlags::CLIENT,
            "Show tick and command counters",
            Box::new(move |_, invocation| {
                info!(
                    "tick {} | fifo lines {} | executed {} | rejected {}",
                    status_counters.ticks.get(),
                    status_counters.fifo_lines.get(),
                    invocation.console.executed_count(),
                    invocation.console.rejected_count()
                );
                Ok(())
            }),
        )?;

        let mut fifo = Fifo::new();
        fifo.init(&config.cl_input_fifo, config.fifo_flag);

        Ok(Self {
            console,
            fifo,
            quit,
            counters,
            tick_interval: config.tick_interval(),
        })
    }

    pub fn console(&self) -> &Console {
        &self.console
    }

    pub fn fifo(&self) -> &Fifo {
        &self.fifo
    }

    pub fn quit_requested(&self) -> bool {
        self.quit.get()
    }

    pub fn ticks(&self) -> u64 {
        self.counters.ticks.get()
    }

    /// One frame: drain the FIFO into the console.
    pub fn tick(&mut self) {
        let lines = self.fifo.update(&mut self.console);
        self.counters
            .fifo_lines
            .set(self.counters.fifo_lines.get() + lines as u64);
        self.counters.ticks.set(self.counters.ticks.get() + 1);
    }

    /// Tick until `quit` is executed or `max_ticks` have run.
    pub fn run(&mut self, max_ticks: Option<u64>) {
        while !self.quit_requested() && max_ticks.is_none_or(|max| self.ticks() < max) {
            let started = Instant::now();
            self.tick();
            if let Some(remaining) = self.tick_interval.checked_sub(started.elapsed()) {
                thread::sleep(remaining);
            }
        }
        info!("stopping after {} ticks", self.ticks());
    }

    pub fn shutdown(&mut self) {
        self.fifo.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_without_fifo_runs_max_ticks() {
        let config = ClientConfig {
            tick_rate: 1000,
            ..Default::default()
        };
        let mut host = Host::new(&config).unwrap();
        assert!(!host.fifo().is_active());

        host.run(Some(3));
        assert_eq!(host.ticks(), 3);
        assert!(!host.quit_requested());
    }

    #[test]
    fn test_registered_commands() {
        let host = Host::new(&ClientConfig::default()).unwrap();
        assert_eq!(
            host.console().command_names(ConfigFlags::CLIENT),
            vec!["echo", "help", "quit", "status"]
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_quit_through_fifo() {
        use std::fs::OpenOptions;
        use std::io::Write;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("client.fifo");
        let config = ClientConfig {
            cl_input_fifo: path.to_str().unwrap().to_string(),
            tick_rate: 1000,
            ..Default::default()
        };
        let mut host = Host::new(&config).unwrap();
        assert!(host.fifo().is_active());

        let mut writer = OpenOptions::new().write(true).open(&path).unwrap();
        writer.write_all(b"echo hello; status\nquit\n").unwrap();

        host.run(Some(100));
        assert!(host.quit_requested());
        assert_eq!(host.ticks(), 1);
        assert_eq!(host.console().executed_count(), 3);

        host.shutdown();
        assert!(!host.fifo().is_active());
        assert!(!path.exists());
    }
}
