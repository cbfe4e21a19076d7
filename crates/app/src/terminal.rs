//! Line-oriented presentation of a quiz session.

use std::io::{self, BufRead, Write};

use quiz_core::catalog::BONUS_CHALLENGE;
use quiz_core::model::{Profile, QuizSession, Verdict};
use services::QuizService;

/// What the learner chose on the results screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AfterResults {
    SameQuestions,
    NewQuestions,
    Quit,
}

/// Renders session state to `out` and turns lines from `input` into session operations.
pub struct Terminal<R, W> {
    input: R,
    out: W,
}

impl<R: BufRead, W: Write> Terminal<R, W> {
    pub fn new(input: R, out: W) -> Self {
        Self { input, out }
    }

    /// Run quizzes for `profile` until the learner quits or input ends.
    pub async fn play(&mut self, service: &QuizService, profile: Profile) -> io::Result<()> {
        let Some(mut session) = self.start(service, profile).await? else {
            return Ok(());
        };

        loop {
            if session.is_finished() {
                self.show_results(&session)?;
                self.ask_bonus(&mut session)?;
                match self.after_results()? {
                    AfterResults::Quit => return Ok(()),
                    AfterResults::SameQuestions => {
                        // Regeneration is off, so this cannot fail.
                        if let Err(err) = service.restart(&mut session, false).await {
                            writeln!(self.out, "Could not restart: {err}")?;
                        }
                    }
                    AfterResults::NewQuestions => {
                        writeln!(self.out, "Fetching new questions...")?;
                        if let Err(err) = service.restart(&mut session, true).await {
                            writeln!(self.out, "Could not fetch new questions: {err}")?;
                            writeln!(self.out, "Starting over with the same questions.")?;
                            if let Err(err) = service.restart(&mut session, false).await {
                                writeln!(self.out, "Could not restart: {err}")?;
                            }
                        }
                    }
                }
                continue;
            }

            if !self.ask_question(service, &mut session).await? {
                return Ok(());
            }
        }
    }

    /// The "not started" screen: keep offering a retry until a session exists.
    async fn start(
        &mut self,
        service: &QuizService,
        profile: Profile,
    ) -> io::Result<Option<QuizSession>> {
        loop {
            writeln!(self.out, "Getting your quiz ready...")?;
            match service.start(profile.clone()).await {
                Ok(session) => return Ok(Some(session)),
                Err(err) => {
                    tracing::warn!(error = %err, "could not start quiz");
                    writeln!(self.out, "Could not build a quiz: {err}")?;
                    let Some(line) = self.prompt("[r] try again  [q] quit > ")? else {
                        return Ok(None);
                    };
                    if line.eq_ignore_ascii_case("q") {
                        return Ok(None);
                    }
                }
            }
        }
    }

    /// Show the current question and apply one command. Returns `false` to stop.
    async fn ask_question(
        &mut self,
        service: &QuizService,
        session: &mut QuizSession,
    ) -> io::Result<bool> {
        let index = session.current_index();
        let Some(question) = session.current_question() else {
            return Ok(true);
        };
        let recorded = session.answer(index).map(str::to_owned);

        writeln!(self.out)?;
        writeln!(
            self.out,
            "Question {} of {} - {}",
            index + 1,
            session.total(),
            question.subject()
        )?;
        writeln!(self.out, "{}", question.prompt())?;
        for (i, option) in question.options().iter().enumerate() {
            let marker = if recorded.as_deref() == Some(option.as_str()) {
                "*"
            } else {
                " "
            };
            writeln!(self.out, " {marker}{}) {option}", i + 1)?;
        }
        let options = question.options().clone();

        let controls = if index > 0 {
            "[1-4] answer  [p] previous  [c] change profile  [q] quit > "
        } else {
            "[1-4] answer  [c] change profile  [q] quit > "
        };
        let Some(line) = self.prompt(controls)? else {
            return Ok(false);
        };

        match line.as_str() {
            "q" | "Q" => return Ok(false),
            "p" | "P" if index > 0 => {
                if let Err(err) = session.go_to_previous() {
                    writeln!(self.out, "{err}")?;
                }
            }
            "c" | "C" => self.change_profile(service, session).await?,
            other => match other.parse::<usize>() {
                Ok(choice) if (1..=options.len()).contains(&choice) => {
                    if let Err(err) = service.submit_answer(session, index, &options[choice - 1]) {
                        writeln!(self.out, "{err}")?;
                    }
                }
                _ => writeln!(self.out, "Please pick one of the options shown.")?,
            },
        }
        Ok(true)
    }

    async fn change_profile(
        &mut self,
        service: &QuizService,
        session: &mut QuizSession,
    ) -> io::Result<()> {
        let Some(age) = self.prompt("New age > ")? else {
            return Ok(());
        };
        let Ok(age) = age.parse::<u8>() else {
            writeln!(self.out, "That is not an age.")?;
            return Ok(());
        };
        let interests = self
            .prompt("Interests, separated by commas > ")?
            .unwrap_or_default();
        let profile = match Profile::new(age, interests.split(',')) {
            Ok(profile) => profile,
            Err(err) => {
                writeln!(self.out, "{err}")?;
                return Ok(());
            }
        };

        writeln!(self.out, "Getting a new quiz ready...")?;
        if let Err(err) = service.switch_profile(session, profile).await {
            writeln!(self.out, "Could not build a quiz for that profile: {err}")?;
        }
        Ok(())
    }

    fn show_results(&mut self, session: &QuizSession) -> io::Result<()> {
        writeln!(self.out)?;
        writeln!(self.out, "Quiz complete!")?;
        writeln!(
            self.out,
            "Your final score: {} out of {}!",
            session.score(),
            session.total()
        )?;
        writeln!(self.out)?;
        writeln!(self.out, "Review your answers:")?;
        for row in session.review() {
            writeln!(self.out, "Question {}: {}", row.index + 1, row.question.prompt())?;
            match row.verdict {
                Verdict::Correct => {
                    writeln!(self.out, "  correct: {}", row.given.unwrap_or_default())?;
                }
                Verdict::Incorrect | Verdict::Unanswered => {
                    writeln!(
                        self.out,
                        "  your answer: {}",
                        row.given.unwrap_or("Not answered")
                    )?;
                    writeln!(
                        self.out,
                        "  correct answer: {}",
                        row.question.correct_option()
                    )?;
                }
            }
            if let Some(explanation) = row.question.explanation() {
                writeln!(self.out, "  {explanation}")?;
            }
        }
        Ok(())
    }

    fn ask_bonus(&mut self, session: &mut QuizSession) -> io::Result<()> {
        writeln!(self.out)?;
        writeln!(self.out, "Bonus challenge (just for fun!)")?;
        writeln!(self.out, "{BONUS_CHALLENGE}")?;
        let reply = self.prompt("Your amazing idea > ")?.unwrap_or_default();
        if let Err(err) = session.record_bonus_answer(reply) {
            writeln!(self.out, "{err}")?;
        }
        Ok(())
    }

    fn after_results(&mut self) -> io::Result<AfterResults> {
        loop {
            let Some(line) = self.prompt("[s] same questions  [n] new questions  [q] quit > ")?
            else {
                return Ok(AfterResults::Quit);
            };
            match line.as_str() {
                "s" | "S" => return Ok(AfterResults::SameQuestions),
                "n" | "N" => return Ok(AfterResults::NewQuestions),
                "q" | "Q" => return Ok(AfterResults::Quit),
                _ => writeln!(self.out, "Please choose s, n or q.")?,
            }
        }
    }

    /// Print `label` and read one trimmed line; `None` at end of input.
    fn prompt(&mut self, label: &str) -> io::Result<Option<String>> {
        write!(self.out, "{label}")?;
        self.out.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}
