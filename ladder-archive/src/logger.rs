// Copyright 2025-2026 Ladder Archive Authors.
// This file is part of ladder-archive.

// ladder-archive is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

// ladder-archive is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.

// You should have received a copy of the GNU General Public License
// along with ladder-archive.  If not, see <http://www.gnu.org/licenses/>.

//! logging

use std::{io, path::Path};

use fern::colors::{Color, ColoredLevelConfig};

pub fn init(std: log::LevelFilter, file: log::LevelFilter, log_dir: &Path) -> io::Result<()> {
	let colors = ColoredLevelConfig::new()
		.info(Color::Green)
		.warn(Color::Yellow)
		.error(Color::Red)
		.debug(Color::Blue)
		.trace(Color::Magenta);

	std::fs::create_dir_all(log_dir)?;
	let log_file = log_dir.join("ladder-archive.logs");

	let stdout_dispatcher = fern::Dispatch::new()
		.level_for("ladder_archive", std)
		.level_for("sqlx", log::LevelFilter::Error)
		.level_for("hyper", log::LevelFilter::Warn)
		.level_for("reqwest", log::LevelFilter::Warn)
		.format(move |out, message, record| {
			out.finish(format_args!(
				"{} {} {}",
				chrono::Local::now().format("[%H:%M]"),
				colors.color(record.level()),
				message,
			))
		})
		.chain(fern::Dispatch::new().level(std).chain(std::io::stdout()));

	let file_dispatcher = fern::Dispatch::new()
		.level(file)
		.level_for("ladder_archive", file)
		.level_for("sqlx", log::LevelFilter::Warn)
		.level_for("hyper", log::LevelFilter::Warn)
		.format(move |out, message, record| {
			out.finish(format_args!(
				"{} [{}][{}] {}::{};{}",
				chrono::Local::now().format("[%Y-%m-%d][%H:%M:%S]"),
				record.target(),
				record.level(),
				message,
				format_opt(record.file().map(|s| s.to_string())),
				format_opt(record.line().map(|n| n.to_string()))
			))
		})
		.chain(fern::log_file(log_file)?);

	fern::Dispatch::new()
		.chain(stdout_dispatcher)
		.chain(file_dispatcher)
		.apply()
		.map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
	Ok(())
}

fn format_opt(file: Option<String>) -> String {
	match file {
		None => "".to_string(),
		Some(f) => f,
	}
}
