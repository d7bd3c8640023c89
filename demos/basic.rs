//! Basic usage example for ingredients-core

use ingredients_core::{CommandInterpreter, FixedTime, PuzzleSession, SessionId, SimpleRng, Step};

fn main() {
    let mut rng = SimpleRng::new();
    let mut session = PuzzleSession::new(SessionId(1), &mut rng);
    let target = session.target();

    println!("Secret dish: {} ({}, {})", target.name(), target.course(), target.technique());
    println!("Timer digit: {}", target.required_digit());
    println!(
        "Offered: {}",
        session
            .initial_ingredients()
            .iter()
            .map(|i| i.name())
            .collect::<Vec<_>>()
            .join(", ")
    );

    // Solve it through the command protocol
    let names: Vec<&str> = target.ingredients().map(|i| i.name()).collect();
    let command = format!(
        "add {}; press {} on {}",
        names.join(", "),
        target.technique().button_name(),
        target.required_digit()
    );
    println!("\nCommand: {}", command);

    let timer = FixedTime(format!("0{}:00", target.required_digit()));
    let mut interpreter = CommandInterpreter::new(&command);
    loop {
        let step = interpreter.resume(&mut session, &timer);
        match &step {
            Step::Pressed { button, feedback } => println!("  {} -> {:?}", button, feedback),
            Step::Wait(_) | Step::AwaitingTimer { .. } => {}
            Step::Finished => println!("Done."),
            Step::Aborted(err) => println!("Aborted: {}", err),
            Step::Cancelled => println!("Cancelled."),
        }
        if step.is_terminal() {
            break;
        }
    }

    println!("Solved: {}", session.is_solved());
}
