//! Command-line front end: export a filtered presence matrix or print one page
//! of it.

use std::{num::NonZeroUsize, path::PathBuf};

use anyhow::Context;
use appmatrix::{
    io::{open_session, write_chunks, write_matrix_file},
    MatrixOption, RecordTable, Session, View,
};
use clap::{Args, Parser};
use comfy_table::{presets::UTF8_FULL, Table};
use tracing_subscriber::EnvFilter;

#[derive(Args, Debug)]
struct Input {
    /// Observation CSV with at least the row and column identity columns.
    #[arg(long)]
    input: PathBuf,
    /// Saved filter file; defaults to the default filter in `--filter-dir`.
    #[arg(long)]
    filter: Option<PathBuf>,
    /// Directory searched for the default filter.
    #[arg(long, default_value = "saved_filters")]
    filter_dir: PathBuf,
    /// Column forming the matrix rows.
    #[arg(long, default_value = "Username")]
    row_column: String,
    /// Column forming the matrix columns.
    #[arg(long, default_value = "Name")]
    col_column: String,
}

#[derive(Parser, Debug)]
#[command(author, version, about = "User × application presence matrices")]
enum Command {
    /// Write the full Yes/No matrix and its column chunks.
    Export {
        #[command(flatten)]
        input: Input,
        /// Full matrix output path.
        #[arg(long, default_value = "user_app_presence_matrix.csv")]
        output: PathBuf,
        /// Directory for chunk files.
        #[arg(long, default_value = "matrix_chunks")]
        chunk_dir: PathBuf,
        /// Columns per chunk file.
        #[arg(long, default_value = "50")]
        chunk_size: NonZeroUsize,
    },
    /// Print one page of the matrix.
    View {
        #[command(flatten)]
        input: Input,
        /// One-based page number; out-of-range pages clamp.
        #[arg(long, default_value = "1")]
        page: usize,
        /// Columns per page.
        #[arg(long, default_value = "10")]
        page_size: NonZeroUsize,
    },
}

fn open(input: &Input, option: MatrixOption) -> anyhow::Result<(RecordTable, Session)> {
    open_session(&input.input, input.filter.as_deref(), option)
        .with_context(|| format!("loading {}", input.input.display()))
}

fn option_for(input: &Input) -> MatrixOption {
    MatrixOption::default()
        .row_column(input.row_column.clone())
        .col_column(input.col_column.clone())
        .filter_dir(input.filter_dir.clone())
}

fn print_view(view: &View) {
    let page = &view.page;
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    let mut header = vec![page.matrix().row_label().to_string()];
    header.extend(page.columns().iter().cloned());
    table.set_header(header);
    for (index, row) in page.rows().iter().enumerate() {
        let mut cells = vec![row.clone()];
        cells.extend(page.matrix().row_cells(index).iter().map(|present| {
            if *present {
                appmatrix::matrix::PRESENT.to_string()
            } else {
                appmatrix::matrix::NOT_PRESENT.to_string()
            }
        }));
        table.add_row(cells);
    }
    println!("{table}");
    println!("Page {}/{}", page.number(), page.total_pages());
    println!(
        "Showing {} users and {} apps of Total Apps {} ({} of {} rows matched)",
        view.row_count(),
        view.visible_columns(),
        view.total_columns(),
        view.selected_rows,
        view.total_rows,
    );
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cmd = Command::parse();

    match cmd {
        Command::Export {
            input,
            output,
            chunk_dir,
            chunk_size,
        } => {
            let option = option_for(&input)
                .chunk_dir(chunk_dir)
                .chunk_size(chunk_size);
            let (table, session) = open(&input, option)?;
            let (matrix, _) = session.matrix(&table)?;
            write_matrix_file(&matrix, &output)?;
            println!("Full matrix saved to: {}", output.display());
            let option = session.option();
            for path in write_chunks(&matrix, option.chunk_dir_path(), option.chunk_width())? {
                println!("Chunk saved: {}", path.display());
            }
        }
        Command::View {
            input,
            page,
            page_size,
        } => {
            let option = option_for(&input).page_size(page_size);
            let (table, mut session) = open(&input, option)?;
            let view = session.render_page(&table, page)?;
            print_view(&view);
        }
    }

    Ok(())
}
