use spandb_core::Database;
use std::io::{self, Write};

fn main() {
    let mut db = Database::new();

    println!("spandb_cli (type 'help' or 'exit')");

    loop {
        print!("ddl> ");
        io::stdout().flush().unwrap();

        let mut line = String::new();
        match io::stdin().read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {}
            Err(_) => {
                println!("Failed to read input");
                continue;
            }
        }

        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        if input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit") {
            break;
        }

        if input.eq_ignore_ascii_case("help") {
            println!("Commands: <DDL statement>[; <DDL statement> ...], show, exit, help");
            continue;
        }

        if input.eq_ignore_ascii_case("show") {
            print!("{}", db.describe());
            continue;
        }

        match db.execute(input) {
            Ok(out) => println!("{out}"),
            Err(err) => println!("{err}"),
        }
    }
}
