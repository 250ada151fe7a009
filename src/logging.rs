use log::LevelFilter;

/// Routes `log` macros to stdout with a timestamp, level and target prefix.
///
/// Call once at the top of a binary before anything logs. A second call
/// fails because the global logger can only be installed once.
pub fn init(level: LevelFilter) -> Result<(), fern::InitError> {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {} {}] {}",
                chrono::Local::now().format("%H:%M:%S%.3f"),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(level)
        .chain(std::io::stdout())
        .apply()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_installs_exactly_once() {
        assert!(init(LevelFilter::Off).is_ok());
        assert!(init(LevelFilter::Off).is_err());
    }
}
