//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

use garnet::cli;
use garnet::cli::DriverOptions;
use garnet::reader::UpdateKind;
use garnet::DomTree;
use std::io::ErrorKind;
use std::{fs, io};

fn main() -> io::Result<()> {
    let opts = cli::driver(
        "replays CFG update scripts against the incremental dominator tree",
        "Usage: domrun [options] <input scripts>",
    )
    .run();

    init_logging(opts.verbose);

    assert!(!opts.inputs.is_empty(), "expected at least one graph script");

    for input in opts.inputs.iter() {
        let source = fs::read_to_string(input).expect("file did not exist");

        if let Err(()) = replay_single_file(&source, &opts) {
            return Err(io::Error::new(
                ErrorKind::InvalidData,
                "failed to replay graph script",
            ));
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let mut builder = env_logger::Builder::from_default_env();

    if verbose {
        builder.filter_level(log::LevelFilter::Trace);
    }

    builder.target(env_logger::Target::Stderr).init();
}

fn replay_single_file(source: &str, opts: &DriverOptions) -> Result<(), ()> {
    let script = match garnet::parse_graph_script(source) {
        Ok(script) => script,
        Err(e) => {
            eprintln!("failed to parse: {e}");

            return Err(());
        }
    };

    let mut built = script.build();
    let mut tree = DomTree::compute(&built.cfg, built.entry);

    if !verified(&tree, &built, opts, "initial construction") {
        return Err(());
    }

    for update in script.updates.iter() {
        let from = built.block(update.from);
        let to = built.block(update.to);

        match update.kind {
            UpdateKind::Insert => {
                built.cfg.connect(from, to);
                tree.insert_arc(&built.cfg, from, to);
            }
            UpdateKind::Delete => {
                built.cfg.disconnect(from, to);
                tree.delete_arc(&built.cfg, from, to);
            }
        }

        if !verified(&tree, &built, opts, "update") {
            return Err(());
        }
    }

    match &opts.output {
        Some(path) => {
            let err = format!("unable to write output to file `{}`", path.display());

            fs::write(path, tree.display(&built.cfg)).expect(&err);
        }
        None => {
            print!("{}", tree.display(&built.cfg));
        }
    }

    Ok(())
}

fn verified(
    tree: &DomTree,
    built: &garnet::reader::BuiltGraph,
    opts: &DriverOptions,
    when: &str,
) -> bool {
    if opts.checks.is_empty() || tree.verify(&built.cfg, opts.checks) {
        true
    } else {
        eprintln!("dominator tree failed verification after {when}");

        false
    }
}
