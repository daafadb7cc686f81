use std::time::Duration;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

fn parse_args(args: &[String]) -> Option<(reqwest::Method, String, Duration)> {
    if args.len() < 2 {
        return None;
    }

    let method = match args[0].to_ascii_uppercase().as_str() {
        "HEAD" => reqwest::Method::HEAD,
        "GET" => reqwest::Method::GET,
        _ => return None,
    };

    let timeout = match args.get(2) {
        Some(secs) => Duration::from_secs(secs.parse().ok()?),
        None => DEFAULT_TIMEOUT,
    };

    Some((method, args[1].clone(), timeout))
}

fn main() {
    let args = std::env::args().skip(1).collect::<Vec<String>>();

    let Some((method, url, timeout)) = parse_args(&args) else {
        println!("usage: check-http <HEAD|GET> <url> [timeout-secs]");
        std::process::exit(64);
    };

    let client = reqwest::blocking::Client::builder()
        .timeout(timeout)
        .build()
        .expect("error building http client");

    match client.request(method, url.as_str()).send() {
        Err(err) => {
            println!("ERROR: {}, {}", url, err);
            std::process::exit(1);
        }
        Ok(result) => {
            if !result.status().is_success() {
                println!("ERROR: {}, status {}", url, result.status());
                std::process::exit(1);
            }

            println!("OK");
        }
    }
}
