//! Line-oriented session driving the controller from stdin.

use std::time::Instant;

use anyhow::{anyhow, bail, Result};
use client_core::{Column, Location, OrdersTableController};
use shared::domain::OrderId;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

use crate::render::render_view;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Search(String),
    Page(usize),
    PageSize(usize),
    Sort(Column),
    Select(OrderId),
    Close,
    Toggle(Column),
    Show,
    Url,
    Quit,
}

pub fn parse_command(line: &str) -> Result<Command> {
    let line = line.trim_start();
    let (verb, arg) = match line.split_once(char::is_whitespace) {
        Some((verb, arg)) => (verb, arg.trim()),
        None => (line.trim_end(), ""),
    };

    let command = match verb {
        // keep inner spaces; the filter trims on application
        "search" => Command::Search(line[verb.len()..].trim_start().to_string()),
        "page" => Command::Page(parse_number(arg)?.saturating_sub(1)),
        "size" => {
            let size = parse_number(arg)?;
            if size == 0 {
                bail!("page size must be positive");
            }
            Command::PageSize(size)
        }
        "sort" => Command::Sort(parse_column(arg)?),
        "select" if arg.is_empty() => bail!("select needs an order id"),
        "select" => Command::Select(OrderId::new(arg)),
        "close" => Command::Close,
        "toggle" => Command::Toggle(parse_column(arg)?),
        "show" | "" => Command::Show,
        "url" => Command::Url,
        "quit" | "exit" => Command::Quit,
        other => bail!("unknown command '{other}'"),
    };
    Ok(command)
}

fn parse_number(arg: &str) -> Result<usize> {
    arg.parse()
        .map_err(|_| anyhow!("expected a number, got '{arg}'"))
}

fn parse_column(arg: &str) -> Result<Column> {
    Column::from_id(arg).ok_or_else(|| anyhow!("unknown column '{arg}'"))
}

enum Outcome {
    Render,
    Print(String),
    Nothing,
    Quit,
}

fn apply(controller: &mut OrdersTableController<Location>, command: Command) -> Outcome {
    match command {
        Command::Search(text) => {
            controller.on_search_input(&text, Instant::now());
            Outcome::Nothing
        }
        Command::Page(index) => {
            let size = controller.view_state().page_size;
            controller.on_page_change(index, size);
            Outcome::Render
        }
        Command::PageSize(size) => {
            controller.on_page_size_change(size);
            Outcome::Render
        }
        Command::Sort(column) => {
            controller.on_sort_header(column);
            Outcome::Render
        }
        Command::Select(id) => {
            controller.select_order(&id);
            Outcome::Render
        }
        Command::Close => {
            controller.close_details();
            Outcome::Render
        }
        Command::Toggle(column) => {
            controller.toggle_column(column);
            Outcome::Render
        }
        Command::Show => Outcome::Render,
        Command::Url => Outcome::Print(controller.navigator().url().to_string()),
        Command::Quit => Outcome::Quit,
    }
}

pub async fn run(controller: &mut OrdersTableController<Location>) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let deadline = controller.search_deadline();
        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = sleep_until(deadline), if deadline.is_some() => {
                if controller.poll_search(Instant::now()) {
                    print!("{}", render_view(controller));
                }
                continue;
            }
        };

        let Some(line) = line else {
            break;
        };
        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(err) => {
                eprintln!("{err}");
                continue;
            }
        };
        debug!(?command, "console command");

        match apply(controller, command) {
            Outcome::Render => print!("{}", render_view(controller)),
            Outcome::Print(text) => println!("{text}"),
            Outcome::Nothing => {}
            Outcome::Quit => break,
        }
    }

    // flush a search typed right before end of input
    if let Some(deadline) = controller.search_deadline() {
        sleep_until(Some(deadline)).await;
        controller.poll_search(Instant::now());
    }
    Ok(())
}

async fn sleep_until(deadline: Option<Instant>) {
    if let Some(deadline) = deadline {
        tokio::time::sleep_until(tokio::time::Instant::from_std(deadline)).await;
    }
}
