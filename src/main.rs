use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use subscheme::interpreter;

fn main() {
    pretty_env_logger::init();

    println!("Subscheme expression interpreter");
    println!("Enter S-expressions like: (+ 1 2)");
    println!("Press Ctrl+C or Ctrl+D to exit.");
    println!();

    let mut rl = DefaultEditor::new().expect("could not initialize line editor");

    loop {
        match rl.readline("subscheme> ") {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(line);

                match interpreter::run(line) {
                    Ok(printed) => println!("{printed}"),
                    Err(e) => println!("Error: {e}"),
                }
            }
            Err(ReadlineError::Eof) | Err(ReadlineError::Interrupted) => {
                println!("Goodbye!");
                break;
            }
            Err(err) => {
                println!("Error: {err:?}");
                break;
            }
        }
    }
}
