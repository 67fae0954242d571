//! Interactive console menu over any line-based input and output.

use std::io::{BufRead, Write};

use tracing::{error, info};

use crate::error::Result;
use crate::goal::{score_to_next_level, Goal, QuestLedger};
use crate::persistence::{ProgressStore, SaveFormat};

const MENU: &str = "\nMenu:\n\
    1. Record Goal Event\n\
    2. Add New Goal\n\
    3. Save Progress\n\
    4. Load Progress\n\
    5. Exit";

pub struct Shell<'a, R, W> {
    ledger: QuestLedger,
    store: &'a dyn ProgressStore,
    format: SaveFormat,
    input: R,
    output: W,
}

impl<'a, R: BufRead, W: Write> Shell<'a, R, W> {
    pub fn new(
        ledger: QuestLedger,
        store: &'a dyn ProgressStore,
        format: SaveFormat,
        input: R,
        output: W,
    ) -> Self {
        Self {
            ledger,
            store,
            format,
            input,
            output,
        }
    }

    pub fn ledger(&self) -> &QuestLedger {
        &self.ledger
    }

    pub fn into_ledger(self) -> QuestLedger {
        self.ledger
    }

    /// Run the menu until the user exits or input ends
    pub fn run(&mut self) -> Result<()> {
        loop {
            self.show_status()?;
            writeln!(self.output, "{}", MENU)?;

            let Some(choice) = self.prompt("\nSelect an option: ")? else {
                break;
            };

            match choice.parse::<u32>() {
                Ok(1) => self.record_event()?,
                Ok(2) => self.add_goal()?,
                Ok(3) => self.save()?,
                Ok(4) => self.load()?,
                Ok(5) => break,
                _ => writeln!(self.output, "Invalid option, please try again.")?,
            }
        }
        info!("Session ended with score {}", self.ledger.score());
        Ok(())
    }

    fn show_status(&mut self) -> Result<()> {
        writeln!(self.output, "\nEternal Quest")?;
        for (i, goal) in self.ledger.goals().iter().enumerate() {
            writeln!(self.output, "{}. {}", i + 1, goal)?;
        }
        writeln!(self.output, "{}", self.ledger.summary())?;
        if let Some(needed) = score_to_next_level(self.ledger.score()) {
            writeln!(self.output, "{} points to the next level", needed)?;
        }
        Ok(())
    }

    /// Print `message` and read one trimmed line, `None` at end of input
    fn prompt(&mut self, message: &str) -> Result<Option<String>> {
        write!(self.output, "{}", message)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn prompt_number(&mut self, message: &str) -> Result<Option<u32>> {
        let Some(answer) = self.prompt(message)? else {
            return Ok(None);
        };
        match answer.parse::<u32>() {
            Ok(n) => Ok(Some(n)),
            Err(_) => {
                writeln!(self.output, "'{}' is not a valid number.", answer)?;
                Ok(None)
            }
        }
    }

    fn record_event(&mut self) -> Result<()> {
        let Some(answer) = self.prompt("Enter the goal number to record an event: ")? else {
            return Ok(());
        };
        // Goals are shown 1-based; anything unparsable or out of range is ignored
        let Some(index) = answer.parse::<usize>().ok().and_then(|n| n.checked_sub(1)) else {
            return Ok(());
        };

        let level_before = self.ledger.level();
        if let Some(points) = self.ledger.try_record_event(index) {
            writeln!(self.output, "You earned {} points!", points)?;
            if self.ledger.level() > level_before {
                writeln!(self.output, "Level up! You are now level {}.", self.ledger.level())?;
            }
        }
        Ok(())
    }

    fn add_goal(&mut self) -> Result<()> {
        writeln!(self.output, "\n1. Simple Goal\n2. Eternal Goal\n3. Checklist Goal")?;
        let Some(kind) = self.prompt_number("Choose goal type: ")? else {
            return Ok(());
        };
        if !(1..=3).contains(&kind) {
            writeln!(self.output, "Invalid goal type.")?;
            return Ok(());
        }

        let Some(name) = self.prompt("Enter goal name: ")? else {
            return Ok(());
        };
        let Some(points) = self.prompt_number("Enter points: ")? else {
            return Ok(());
        };

        let goal = match kind {
            1 => Goal::simple(name, points),
            2 => Goal::eternal(name, points),
            _ => {
                let Some(target_count) = self.prompt_number("Enter target count: ")? else {
                    return Ok(());
                };
                let Some(bonus_points) = self.prompt_number("Enter bonus points: ")? else {
                    return Ok(());
                };
                Goal::checklist(name, points, target_count, bonus_points)
            }
        };

        match goal {
            Ok(goal) => {
                self.ledger.add_goal(goal);
            }
            Err(e) => writeln!(self.output, "{}", e)?,
        }
        Ok(())
    }

    fn save(&mut self) -> Result<()> {
        match self.ledger.save_to(self.store, self.format) {
            Ok(()) => writeln!(self.output, "Progress saved!")?,
            Err(e) => {
                error!("Failed to save progress: {}", e);
                writeln!(self.output, "Could not save progress: {}", e)?;
            }
        }
        Ok(())
    }

    fn load(&mut self) -> Result<()> {
        match self.ledger.load_from(self.store) {
            Ok(true) => writeln!(self.output, "Progress loaded!")?,
            Ok(false) => writeln!(self.output, "No saved progress found.")?,
            Err(e) => {
                error!("Failed to load progress: {}", e);
                writeln!(self.output, "Could not load progress: {}", e)?;
            }
        }
        Ok(())
    }
}
