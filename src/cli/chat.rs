use anyhow::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use super::banner;
use crate::ai::chat::ConversationSession;

#[derive(Debug, PartialEq)]
enum Input<'a> {
    Quit,
    Clear,
    Stats,
    Help,
    Question(&'a str),
    Empty,
}

fn parse_input(line: &str) -> Input<'_> {
    let line = line.trim();
    match line.to_lowercase().as_str() {
        "" => Input::Empty,
        "quit" | "exit" => Input::Quit,
        "clear" => Input::Clear,
        "stats" => Input::Stats,
        "help" => Input::Help,
        _ => Input::Question(line),
    }
}

fn print_intro() {
    println!("{}", "=".repeat(60));
    println!("SMART FAQ CHATBOT");
    println!("{}", "=".repeat(60));
    println!("\nAvailable Commands:");
    println!("  'quit' / 'exit'  - Exit the chatbot");
    println!("  'clear'          - Clear chat history");
    println!("  'stats'          - Show statistics");
    println!("  'help'           - Show FAQ topics");
    println!("\nTip: Try urgent queries (with 'URGENT', '!!!', 'ASAP')");
    println!("     vs casual queries to see temperature adjustment!\n");
}

pub async fn run(session: &mut ConversationSession) -> Result<()> {
    let mut rl = DefaultEditor::new()?;
    print_intro();

    loop {
        let readline = rl.readline("You: ");
        match readline {
            Ok(line) => match parse_input(&line) {
                Input::Empty => continue,
                Input::Quit => {
                    println!("\n{}\n", session.stats());
                    println!("Thank you for using FAQ Chatbot! Goodbye!");
                    break;
                }
                Input::Clear => {
                    session.clear_history();
                    println!("Chat history cleared!");
                }
                Input::Stats => {
                    println!("\n{}\n", session.stats());
                }
                Input::Help => {
                    println!("\nFAQ Topics:");
                    for topic in session.topics() {
                        println!("  - {}", topic);
                    }
                    println!();
                }
                Input::Question(question) => {
                    let _ = rl.add_history_entry(question);
                    match session.handle(question).await {
                        Ok(result) => {
                            println!("\n{}", banner(&result));
                            println!("Bot: {}\n", result.response);
                        }
                        Err(err) => {
                            println!("\nError: {}\n", err);
                        }
                    }
                }
            },
            Err(ReadlineError::Interrupted) => break,
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse_input("quit"), Input::Quit);
        assert_eq!(parse_input("EXIT"), Input::Quit);
        assert_eq!(parse_input(" clear "), Input::Clear);
        assert_eq!(parse_input("Stats"), Input::Stats);
        assert_eq!(parse_input("help"), Input::Help);
    }

    #[test]
    fn test_parse_empty_and_questions() {
        assert_eq!(parse_input("   "), Input::Empty);
        assert_eq!(
            parse_input("  What are your hours? "),
            Input::Question("What are your hours?")
        );
        assert_eq!(parse_input("help me"), Input::Question("help me"));
    }
}
