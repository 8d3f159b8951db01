extern crate clap;
extern crate image;
extern crate mandelcolor;
extern crate num;
extern crate num_cpus;

use clap::{App, Arg, ArgMatches};
use image::png::PNGEncoder;
use image::ColorType;
use mandelcolor::{BernsteinPalette, RandomPalette, RenderError, Renderer};
use num::Complex;
use std::fs::File;
use std::path::Path;
use std::str::FromStr;

fn parse_pair<T>(s: &str, separator: char) -> Option<(T, T)>
where
    T: FromStr,
{
    match s.find(separator) {
        None => None,
        Some(index) => match (T::from_str(&s[..index]), T::from_str(&s[index + 1..])) {
            (Ok(l), Ok(r)) => Some((l, r)),
            _ => None,
        },
    }
}

fn parse_complex(s: &str) -> Option<Complex<f64>> {
    match parse_pair(s, ',') {
        Some((re, im)) => Some(Complex { re, im }),
        None => None,
    }
}

fn validate_pair<T: FromStr>(s: &str, separator: char, err: &str) -> Result<(), String> {
    match parse_pair::<T>(s, separator) {
        Some(_) => Ok(()),
        None => Err(err.to_string()),
    }
}

fn validate_number<T: FromStr>(s: &str, err: &str) -> Result<(), String> {
    match T::from_str(s) {
        Ok(_) => Ok(()),
        Err(_) => Err(err.to_string()),
    }
}

fn validate_range<T: FromStr + Ord>(
    s: &str,
    low: T,
    high: T,
    isnotanumber_err: &str,
    isnotinrange_err: &str,
) -> Result<(), String> {
    match T::from_str(s) {
        Ok(i) => {
            if i >= low && i <= high {
                Ok(())
            } else {
                Err(isnotinrange_err.to_string())
            }
        }
        Err(_) => Err(isnotanumber_err.to_string()),
    }
}

const OUTPUT: &str = "output";
const SIZE: &str = "size";
const LEFTLOWER: &str = "leftlower";
const RIGHTUPPER: &str = "rightupper";
const THREADS: &str = "threads";
const ITERATIONS: &str = "iterations";
const MODEL: &str = "model";
const CONTRAST: &str = "contrast";
const SUPERSAMPLE: &str = "supersample";
const SAMPLES: &str = "samples";
const SEED: &str = "seed";

fn args<'a>() -> ArgMatches<'a> {
    let max_threads = num_cpus::get();

    App::new("mandel")
        .version("0.1.0")
        .author("Elf M. Sternberg <elf.sternberg@gmail.com>")
        .about("Colored Mandelbrot renderer")
        .arg(
            Arg::with_name(OUTPUT)
                .required(true)
                .long(OUTPUT)
                .short("o")
                .takes_value(true)
                .help("Output file"),
        )
        .arg(
            Arg::with_name(SIZE)
                .required(false)
                .long(SIZE)
                .short("s")
                .takes_value(true)
                .default_value("1024x1024")
                .validator(|s| validate_pair::<u16>(&s, 'x', "Could not parse output image size"))
                .help("Size of output image"),
        )
        .arg(
            Arg::with_name(LEFTLOWER)
                .required(false)
                .long(LEFTLOWER)
                .short("l")
                .takes_value(true)
                .allow_hyphen_values(true)
                .default_value("-2,-2")
                .validator(|s| validate_pair::<f64>(&s, ',', "Could not parse left lower corner"))
                .help("Left lower corner of the mandelbrot space"),
        )
        .arg(
            Arg::with_name(RIGHTUPPER)
                .required(false)
                .long(RIGHTUPPER)
                .short("r")
                .takes_value(true)
                .allow_hyphen_values(true)
                .default_value("2,2")
                .validator(|s| validate_pair::<f64>(&s, ',', "Could not parse right upper corner"))
                .help("Right upper corner of the mandelbrot space"),
        )
        .arg(
            Arg::with_name(THREADS)
                .required(false)
                .long(THREADS)
                .short("t")
                .takes_value(true)
                .default_value("1")
                .validator(move |s| {
                    validate_range(
                        &s,
                        1,
                        max_threads,
                        "Could not parse thread count",
                        &format!("Thread count must be between 1 and {}", max_threads),
                    )
                })
                .help("Number of threads to use in solver"),
        )
        .arg(
            Arg::with_name(ITERATIONS)
                .required(false)
                .long(ITERATIONS)
                .short("i")
                .takes_value(true)
                .default_value("200")
                .validator(move |s| {
                    validate_range(
                        &s,
                        1,
                        200_000,
                        "Could not parse iteration count",
                        "Iteration count must be between 1 and 200000",
                    )
                })
                .help("Number of iterations per point"),
        )
        .arg(
            Arg::with_name(MODEL)
                .required(false)
                .long(MODEL)
                .short("m")
                .takes_value(true)
                .default_value("discrete")
                .possible_values(&["discrete", "smooth"])
                .help("Coloring model"),
        )
        .arg(
            Arg::with_name(CONTRAST)
                .required(false)
                .long(CONTRAST)
                .short("c")
                .takes_value(true)
                .default_value("15")
                .validator(|s| validate_number::<u8>(&s, "Could not parse contrast"))
                .help("Alpha contrast per iteration in the discrete model"),
        )
        .arg(
            Arg::with_name(SUPERSAMPLE)
                .required(false)
                .long(SUPERSAMPLE)
                .short("u")
                .help("Average randomly jittered sub-samples for every output pixel"),
        )
        .arg(
            Arg::with_name(SAMPLES)
                .required(false)
                .long(SAMPLES)
                .short("n")
                .takes_value(true)
                .default_value("4")
                .validator(move |s| {
                    validate_range(
                        &s,
                        1,
                        256,
                        "Could not parse sample count",
                        "Sample count must be between 1 and 256",
                    )
                })
                .help("Number of sub samples per pixel"),
        )
        .arg(
            Arg::with_name(SEED)
                .required(false)
                .long(SEED)
                .takes_value(true)
                .validator(|s| validate_number::<u64>(&s, "Could not parse random seed"))
                .help("Random seed, for reproducible output"),
        )
        .get_matches()
}

fn write_image(outfile: &str, pixels: &[u8], bounds: (usize, usize)) -> Result<(), std::io::Error> {
    let path = Path::new(outfile);
    let output = File::create(&path)?;
    PNGEncoder::new(output).encode(pixels, bounds.0 as u32, bounds.1 as u32, ColorType::RGBA(8))?;
    Ok(())
}

fn configure(
    size: (usize, usize),
    leftlower: Complex<f64>,
    rightupper: Complex<f64>,
    iterations: usize,
    supersample: bool,
    samples: usize,
    seed: Option<u64>,
) -> Result<Renderer, RenderError> {
    let renderer = Renderer::new(size.0, size.1, leftlower, rightupper, iterations)?;
    let renderer = if supersample {
        renderer.supersampled(samples)?
    } else {
        renderer
    };
    Ok(match seed {
        Some(seed) => renderer.seeded(seed),
        None => renderer,
    })
}

fn main() {
    let matches = args();
    let image_size: (usize, usize) =
        parse_pair(matches.value_of(SIZE).unwrap(), 'x').expect("Error parsing image dimensions");
    let leftlower = parse_complex(matches.value_of(LEFTLOWER).unwrap())
        .expect("Error parsing left lower point");
    let rightupper = parse_complex(matches.value_of(RIGHTUPPER).unwrap())
        .expect("Error parsing right upper point");
    let iterations = usize::from_str(matches.value_of(ITERATIONS).unwrap())
        .expect("Could not parse iteration count.");
    let threads =
        usize::from_str(matches.value_of(THREADS).unwrap()).expect("Could not parse thread count.");
    let contrast =
        u8::from_str(matches.value_of(CONTRAST).unwrap()).expect("Could not parse contrast.");
    let samples =
        usize::from_str(matches.value_of(SAMPLES).unwrap()).expect("Could not parse sample count.");
    let seed = matches
        .value_of(SEED)
        .map(|s| u64::from_str(s).expect("Could not parse random seed."));

    let result = configure(
        image_size,
        leftlower,
        rightupper,
        iterations,
        matches.is_present(SUPERSAMPLE),
        samples,
        seed,
    )
    .and_then(|renderer| match matches.value_of(MODEL).unwrap() {
        "smooth" => {
            let mut palette = BernsteinPalette::new(iterations);
            renderer.render(&mut palette, threads)
        }
        _ => {
            let mut palette = match seed {
                Some(seed) => RandomPalette::with_seed(contrast, seed),
                None => RandomPalette::new(contrast),
            };
            renderer.render(&mut palette, threads)
        }
    });

    match result {
        Err(e) => {
            eprintln!("Render failure: {}", e);
            std::process::exit(1);
        }
        Ok(raw) => {
            if let Err(e) = write_image(matches.value_of(OUTPUT).unwrap(), &raw, image_size) {
                eprintln!(
                    "Could not write {}: {}",
                    matches.value_of(OUTPUT).unwrap(),
                    e
                );
                std::process::exit(1);
            }
        }
    }
}
