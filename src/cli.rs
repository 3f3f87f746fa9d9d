use crate::Choice;
use colored::Colorize;
use librenshuu::choice_quiz::ChoiceQuiz;
use librenshuu::flip_deck::FlipDeck;
use librenshuu::match_board::MatchBoard;
use librenshuu::practice_test::{PracticeTest, TestResult};
use librenshuu::quick_quiz::QuickQuiz;
use librenshuu::{BuiltQuestion, QuizError};
use log::debug;
use rand::Rng;
use std::io::{self, Write};
use text_io::read;

fn read_line(prompt: &str) -> String {
    print!("{} ", prompt.cyan());
    io::stdout().flush().ok();
    let line: String = read!("{}\n");
    line.trim().to_string()
}

fn read_choice(prompt: &str, choices_count: usize) -> Choice {
    let choice = Choice::from_str(choices_count, &read_line(prompt));
    debug!("choice: {:?}", choice);
    choice
}

fn print_question(leading: &str, question: &BuiltQuestion) {
    println!(
        "{}{} {}",
        leading.cyan(),
        question.prompt.black().bold().on_white(),
        format!("({})", question.kind.label()).dimmed()
    );
    let indent = " ".repeat(leading.chars().count());
    for (i, option) in question.options.iter().enumerate() {
        println!("{}{}. {}", indent, format!("{}", i + 1).bold(), option.label);
    }
}

fn answer_prompt(options: usize) -> String {
    format!("Answer (1-{}, r to restart, q to quit):", options)
}

pub fn quick_quiz_loop<R: Rng>(quiz: &mut QuickQuiz<R>) {
    if quiz.total() == 0 {
        println!("{}", "Create a practice set to start the quick quiz.".yellow());
        return;
    }
    loop {
        let Some(question) = quiz.current().cloned() else {
            println!("{}", "All questions cleared!".bright_green().bold());
            println!("Start again to keep the material fresh.");
            match read_choice("(r to restart, anything else to quit)", 0) {
                Choice::Restart => {
                    quiz.restart();
                    continue;
                }
                _ => return,
            }
        };

        println!(
            "{}",
            format!(
                "Mastered {} / {} | Remaining {}",
                quiz.mastered(),
                quiz.total(),
                quiz.remaining()
            )
            .blue()
        );
        let leading = format!("Question {}. ", quiz.next_number());
        print_question(&leading, &question);

        match read_choice(&answer_prompt(question.options.len()), question.options.len()) {
            Choice::Option(num) => {
                if let Err(err) = quiz.select(question.options[num].value.clone()) {
                    println!("{}", err.to_string().yellow());
                    continue;
                }
            }
            Choice::Restart => {
                println!("{}", "Restarting!".cyan());
                quiz.restart();
                continue;
            }
            Choice::Quit => {
                println!("{}", "Quitting Early!".cyan());
                return;
            }
            _ => {}
        }

        if let Err(err) = quiz.submit() {
            println!("{}", err.to_string().yellow());
            continue;
        }
        match quiz.feedback() {
            Some(feedback) if feedback.is_correct() => {
                println!("{}", "Correct!".bright_green())
            }
            Some(feedback) => println!(
                "{} You chose {}. Correct answer: {}",
                "Incorrect.".bright_red(),
                quiz.selected().unwrap_or_default().red(),
                feedback.correct_answer.green().bold()
            ),
            None => {}
        }
        if let Err(err) = quiz.advance() {
            println!("{}", err.to_string().yellow());
        }
    }
}

fn print_result(result: &TestResult) {
    println!(
        "{}",
        format!(
            "Score: {} / {} ({}%)",
            result.score,
            result.total,
            result.percent()
        )
        .cyan()
        .bold()
    );
    if result.is_perfect() {
        println!("{}", "Perfect score! Excellent work.".bright_green());
        return;
    }
    println!("{}", "Needs Review".bold());
    for entry in &result.incorrect {
        println!(
            "  - {} - correct answer: {} {}",
            entry.prompt,
            entry.correct.green().bold(),
            format!(
                "(you chose {})",
                entry.selected.as_deref().unwrap_or("no answer")
            )
            .dimmed()
        );
    }
}

/// One line per question with its mark and the option that was picked.
fn print_review<R: Rng>(test: &PracticeTest<R>) {
    for (idx, question) in test.questions().iter().enumerate() {
        let chosen = test
            .response(&question.id)
            .and_then(|value| question.option_by_value(value))
            .map(|option| option.label.as_str())
            .unwrap_or("no answer");
        let mark = match test.question_status(&question.id) {
            Some(true) => "✓".bright_green(),
            Some(false) => "✗".bright_red(),
            None => "?".dimmed(),
        };
        println!(
            "{} {}. {} {}",
            mark,
            idx + 1,
            question.prompt,
            format!("({})", chosen).dimmed()
        );
    }
}

pub fn practice_test_loop<R: Rng>(test: &mut PracticeTest<R>) {
    if test.questions().is_empty() {
        println!("{}", "Add a few practice questions to start testing.".yellow());
        return;
    }
    loop {
        let questions = test.questions().to_vec();
        let total = questions.len();
        for (idx, question) in questions.iter().enumerate() {
            if test.response(&question.id).is_some() {
                continue;
            }
            let leading = format!("{}/{}. ", idx + 1, total);
            print_question(&leading, question);
            loop {
                let prompt = format!("Answer (1-{}, q to quit):", question.options.len());
                match read_choice(&prompt, question.options.len()) {
                    Choice::Option(num) => {
                        let value = question.options[num].value.clone();
                        if let Err(err) = test.record_response(&question.id, value) {
                            println!("{}", err.to_string().yellow());
                        }
                        break;
                    }
                    Choice::Quit => {
                        println!("{}", "Quitting Early!".cyan());
                        return;
                    }
                    _ => println!("{}", "Pick one of the listed options.".yellow()),
                }
            }
        }

        match test.submit() {
            Ok(result) => print_result(result),
            Err(err @ QuizError::Unanswered { .. }) => {
                println!("{}", err.to_string().yellow());
                continue;
            }
            Err(err) => {
                println!("{}", err.to_string().yellow());
                return;
            }
        }
        print_review(test);

        match read_choice("(t to retake, c to clear answers, anything else to quit)", 0) {
            Choice::Retake => test.retake(),
            Choice::Clear => test.reset(),
            _ => return,
        }
    }
}

pub fn choice_quiz_loop<R: Rng>(quiz: &mut ChoiceQuiz<R>) {
    loop {
        let Some(question) = quiz.current().cloned() else {
            println!(
                "{}",
                format!("Finished! Score: {} / {}", quiz.score(), quiz.total())
                    .cyan()
                    .bold()
            );
            match read_choice("(r to restart, anything else to quit)", 0) {
                Choice::Restart => {
                    if let Err(err) = quiz.restart() {
                        println!("{}", err.to_string().yellow());
                        return;
                    }
                    continue;
                }
                _ => return,
            }
        };

        let leading = format!("{}/{}. ", quiz.number(), quiz.total());
        print_question(&leading, &question);
        let prompt = format!(
            "Answer (1-{}, enter to reveal, r to restart, q to quit):",
            question.options.len()
        );
        match read_choice(&prompt, question.options.len()) {
            Choice::Option(num) => {
                if let Err(err) = quiz.select(question.options[num].value.clone()) {
                    println!("{}", err.to_string().yellow());
                    continue;
                }
            }
            Choice::Restart => {
                println!("{}", "Restarting!".cyan());
                if let Err(err) = quiz.restart() {
                    println!("{}", err.to_string().yellow());
                    return;
                }
                continue;
            }
            Choice::Quit => {
                println!("{}", "Quitting Early!".cyan());
                return;
            }
            _ => {}
        }

        if let Err(err) = quiz.reveal() {
            println!("{}", err.to_string().yellow());
            continue;
        }
        match quiz.selected() {
            Some(selected) if question.is_correct(selected) => {
                println!("{}", "Correct!".bright_green())
            }
            Some(_) => println!(
                "{} Correct answer: {}",
                "Incorrect.".bright_red(),
                question.correct_answer.green().bold()
            ),
            None => println!("Answer: {}", question.correct_answer.green().bold()),
        }
        if let Err(err) = quiz.advance() {
            println!("{}", err.to_string().yellow());
        }
    }
}

pub fn flip_loop<R: Rng>(deck: &mut FlipDeck<R>) {
    loop {
        let Some(side) = deck.showing().map(String::from) else {
            println!("{}", "All done!".bright_green().bold());
            match read_choice("(r to reshuffle, anything else to quit)", 0) {
                Choice::Restart => {
                    deck.rebuild();
                    continue;
                }
                _ => return,
            }
        };

        let face = if deck.is_flipped() { "back" } else { "front" };
        println!(
            "{} {} {}",
            format!("[{} left]", deck.remaining()).blue(),
            side.black().bold().on_white(),
            format!("({})", face).dimmed()
        );
        let result = match read_line(
            "(enter to flip, g got it, k keep, s switch side, r reshuffle, q quit)",
        )
        .as_str()
        {
            "" | "f" => deck.flip(),
            "g" => deck.got_it(),
            "k" => deck.keep(),
            "s" => {
                deck.toggle_side();
                let first = if deck.is_term_first() { "Terms" } else { "Definitions" };
                println!("{}", format!("{} first", first).cyan());
                Ok(())
            }
            "r" => {
                deck.rebuild();
                Ok(())
            }
            "q" => {
                println!("{}", "Quitting Early!".cyan());
                return;
            }
            _ => Ok(()),
        };
        if let Err(err) = result {
            println!("{}", err.to_string().yellow());
        }
    }
}

fn print_board<R: Rng>(board: &MatchBoard<R>) {
    println!(
        "{}",
        format!("Correct {} / {}", board.correct_count(), board.total()).blue()
    );
    for (idx, term) in board.terms().iter().enumerate() {
        let placed = match board.placed(&term.id) {
            Some(card) => card.def.as_str().normal(),
            None => "____".dimmed(),
        };
        println!("{}. {} -> {}", format!("{}", idx + 1).bold(), term.term, placed);
    }
    let bank = board.bank();
    if !bank.is_empty() {
        println!("{}", "Definitions".bold());
        for (idx, card) in bank.iter().enumerate() {
            println!("  {}. {}", format!("{}", idx + 1).bold(), card.def);
        }
    }
}

fn parse_index(input: Option<&str>, len: usize) -> Option<usize> {
    match input?.parse::<usize>() {
        Ok(num) if num >= 1 && num <= len => Some(num - 1),
        _ => None,
    }
}

pub fn match_loop<R: Rng>(board: &mut MatchBoard<R>) {
    if board.total() == 0 {
        println!("{}", "Add study items to play matching.".yellow());
        return;
    }
    loop {
        print_board(board);
        if board.is_solved() {
            println!("{}", "All matched!".bright_green().bold());
            match read_choice("(r to play again, anything else to quit)", 0) {
                Choice::Restart => {
                    board.reset();
                    continue;
                }
                _ => return,
            }
        }

        let line = read_line("(<term> <definition> to place, u <term> to clear, r reset, q quit)");
        let mut words = line.split_whitespace();
        match words.next() {
            Some("q") => {
                println!("{}", "Quitting Early!".cyan());
                return;
            }
            Some("r") => board.reset(),
            Some("u") => match parse_index(words.next(), board.total()) {
                Some(term) => {
                    let id = board.terms()[term].id.clone();
                    board.unassign(&id);
                }
                None => println!("{}", "Pick a term number to clear.".yellow()),
            },
            first => {
                let bank: Vec<String> = board.bank().iter().map(|card| card.id.clone()).collect();
                let term = parse_index(first, board.total());
                let definition = parse_index(words.next(), bank.len());
                match (term, definition) {
                    (Some(term), Some(definition)) => {
                        let term_id = board.terms()[term].id.clone();
                        if let Err(err) = board.assign(&term_id, &bank[definition]) {
                            println!("{}", err.to_string().yellow());
                        }
                    }
                    _ => println!("{}", "Type a term number and a definition number.".yellow()),
                }
            }
        }
    }
}
