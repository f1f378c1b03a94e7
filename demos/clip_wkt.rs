extern crate env_logger;
extern crate shapeclip;

use std::env;
use std::io;
use std::io::{BufRead, Write};
use std::process;

use shapeclip::geo::wkb;
use shapeclip::{lineclip, linecut, polyclip, polycut, ClipResult, Geometry, Region};

const USAGE: &str = "Usage: {} [--wkb] <lineclip|polyclip|linecut|polycut> <REGION> [MAX_SEGMENT_LENGTH]

REGION is one of:
    rect XMIN YMIN XMAX YMAX
    circle X Y RADIUS
    sphere LON LAT RADIUS_METRES

Reads one WKT geometry per line on stdin; writes one per line on stdout,
as hex-encoded WKB with --wkb.";

fn usage(program: &str) -> ! {
    writeln!(&mut io::stderr(), "{}", USAGE.replacen("{}", program, 1)).unwrap();
    process::exit(1);
}

fn fail(message: &str) -> ! {
    writeln!(&mut io::stderr(), "{}", message).unwrap();
    process::exit(1);
}

fn parse_numbers(program: &str, args: &[String]) -> Vec<f64> {
    args.iter()
        .map(|s| s.parse::<f64>().unwrap_or_else(|_| usage(program)))
        .collect()
}

fn main() {
    env_logger::init();

    let mut args: Vec<String> = env::args().collect();
    let program = args[0].clone();

    let wkb_output = args.len() > 1 && args[1] == "--wkb";
    if wkb_output {
        args.remove(1);
    }

    if args.len() < 4 {
        usage(&program);
    }

    let operation = args[1].as_str();
    let (region, rest) = match args[2].as_str() {
        "rect" if args.len() >= 7 => {
            let n = parse_numbers(&program, &args[3..7]);
            (Region::rectangle(n[0], n[1], n[2], n[3]), &args[7..])
        }
        "circle" if args.len() >= 6 => {
            let n = parse_numbers(&program, &args[3..6]);
            (Region::circle(n[0], n[1], n[2]), &args[6..])
        }
        "sphere" if args.len() >= 6 => {
            let n = parse_numbers(&program, &args[3..6]);
            (Region::sphere(n[0], n[1], n[2]), &args[6..])
        }
        _ => usage(&program),
    };

    let region = region.unwrap_or_else(|err| fail(&err.to_string()));
    let max_segment_length = match rest.len() {
        0 => 0.0,
        1 => parse_numbers(&program, rest)[0],
        _ => usage(&program),
    };

    let run = |geometry: &Geometry| -> ClipResult<Geometry> {
        match operation {
            "lineclip" => lineclip(geometry, &region),
            "polyclip" => polyclip(geometry, &region, max_segment_length),
            "linecut" => linecut(geometry, &region),
            "polycut" => polycut(geometry, &region, max_segment_length),
            _ => usage(&program),
        }
    };

    let stdin = io::stdin();
    for (i, line) in stdin.lock().lines().enumerate() {
        let line = line.unwrap_or_else(|err| fail(&format!("Error during read: {}", err)));
        if line.trim().is_empty() {
            continue;
        }

        let geometry: Geometry = line.parse()
            .unwrap_or_else(|err| fail(&format!("line {}: {}", i + 1, err)));

        match run(&geometry) {
            Ok(ref result) if wkb_output => {
                let bytes = wkb::to_wkb(result).unwrap_or_else(|err| fail(&format!("line {}: {}", i + 1, err)));
                println!("{}", bytes.iter().map(|b| format!("{:02x}", b)).collect::<String>());
            }
            Ok(result) => println!("{}", result),
            Err(err) => fail(&format!("line {}: {}", i + 1, err)),
        }
    }
}
