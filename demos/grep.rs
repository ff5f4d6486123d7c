//! Thin command-line demo exercising the syntax front-end, construction
//! driver and matcher end to end: `grep PATTERN < input`.
use std::io::BufRead;
use std::io::stdin;

use glushkov_dfa::dfa::DfaBuilder;
use glushkov_dfa::matcher::find;
use glushkov_dfa::options::OptionsBuilder;
use glushkov_dfa::syntax::compile;

fn main() {
	let mut args = std::env::args().skip(1);
	let Some(pattern) = args.next() else {
		eprintln!("usage: grep PATTERN < input");
		std::process::exit(2);
	};

	let (mut arena, root) = match compile(&pattern) {
		Ok(parsed) => parsed,
		Err(err) => {
			eprintln!("bad pattern: {err}");
			std::process::exit(2);
		},
	};

	let options = OptionsBuilder::new().build();
	let mut dfa = match DfaBuilder::new(&mut arena, options).build(root, 1 << 16) {
		Ok(dfa) => dfa,
		Err(err) => {
			eprintln!("could not compile pattern: {err}");
			std::process::exit(1);
		},
	};
	if !dfa.complete() {
		eprintln!("warning: state limit reached, falling back to on-the-fly matching");
	}

	let mut line = String::new();
	let mut input = stdin().lock();
	loop {
		line.clear();
		let n = input.read_line(&mut line).expect("stdin read failed");
		if n == 0 {
			break;
		}
		let bytes = line.trim_end_matches('\n').as_bytes();
		if let Some(range) = find(&mut dfa, bytes) {
			println!("{}", String::from_utf8_lossy(&bytes[range.start..range.end]));
		}
	}
}
