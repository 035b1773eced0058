//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

//! The command-line surface shared by the driver tools under `tools/`.
//!
//! A replay driver always takes the same things: graph scripts to replay,
//! a verification level to run while replaying, and optionally a file to
//! write the final tree to. The whole option set lives here so any future
//! tool presents identical flags.

use crate::dom::Verify;
use bpaf::{construct, OptionParser, Parser};
use std::path::PathBuf;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Everything a replay driver needs to know from the command line.
pub struct DriverOptions {
    /// Verification to run after construction and after every replayed
    /// update.
    pub checks: Verify,
    /// Where to write the final dominator tree; stdout when absent.
    pub output: Option<PathBuf>,
    /// Whether to trace the update machinery to stderr.
    pub verbose: bool,
    /// The graph scripts to replay.
    pub inputs: Vec<PathBuf>,
}

/// Builds the option parser for a replay driver.
pub fn driver(description: &'static str, usage: &'static str) -> OptionParser<DriverOptions> {
    let checks = checks();
    let output = output();
    let verbose = verbose();
    let inputs = inputs();

    construct!(DriverOptions {
        checks,
        output,
        verbose,
        inputs,
    })
    .to_options()
    .descr(description)
    .version(VERSION)
    .usage(usage)
}

// `-c`/`--checks`: how paranoid to be while replaying. Defaults to the
// level worth running in a debug build; `full` adds the quadratic sibling
// check on top of that.
fn checks() -> impl Parser<Verify> {
    bpaf::long("checks")
        .short('c')
        .help("verification after each update, one of 'none', 'basic', 'normal' or 'full'")
        .argument::<String>("LEVEL")
        .guard(
            |level| matches!(level.as_str(), "none" | "basic" | "normal" | "full"),
            "level must be one of 'none', 'basic', 'normal', 'full'",
        )
        .map(|level| match level.as_str() {
            "none" => Verify::empty(),
            "basic" => Verify::BASIC,
            "normal" => Verify::NORMAL,
            "full" => Verify::FULL,
            _ => unreachable!(),
        })
        .optional()
        .map(|opt| match opt {
            Some(level) => level,
            None => Verify::NORMAL,
        })
}

fn output() -> impl Parser<Option<PathBuf>> {
    bpaf::long("output")
        .short('o')
        .help("write the final dominator tree here instead of stdout")
        .argument::<PathBuf>("FILE")
        .optional()
}

fn verbose() -> impl Parser<bool> {
    bpaf::long("verbose")
        .short('v')
        .help("trace the incremental update machinery to stderr")
        .flag(true, false)
}

fn inputs() -> impl Parser<Vec<PathBuf>> {
    bpaf::positional::<PathBuf>("SCRIPTS")
        .help("graph scripts to replay")
        .many()
}
