use stratctl::run;

#[tokio::main]
async fn main() {
    let result = run().await;
    let error = match result {
        Err(error) => error,
        Ok(0) => return,
        Ok(num) => std::process::exit(num),
    };

    // Provide better error messages for cases where we can provide suggestions to the user.
    if let Some(stratctl::ApiNotFound) = error.downcast_ref() {
        eprintln!("{:?}", error);
        eprintln!("Below is a PARTIAL list of likely causes for this error:");
        eprintln!("  * The request was operating on a resource that does not exist (example: a missing project)");
        eprintln!("  * The current session may have expired or be otherwise not valid (please login again)");
        eprintln!("  * The version of the Stratus cluster does not support the request (try to keep stratctl to the same version as your clusters)");
        std::process::exit(1);
    }
    if let Some(error) = error.downcast_ref::<stratctl::NotConnected>() {
        eprintln!("{}", error);
        eprintln!(
            "Try logging in with 'stratctl login --hostname {}', adding --impersonate if you only hold admin credentials",
            error.hostname(),
        );
        std::process::exit(1);
    }
    if let Some(error) = error.downcast_ref::<stratctl::InvalidCredentials>() {
        eprintln!("{}", error);
        std::process::exit(1);
    }
    if let Some(error) = error.downcast_ref::<stratctl::InvalidIdentifier>() {
        eprintln!("{}", error);
        eprintln!("Resource references follow the [owner/][name/][id][:revision] form");
        std::process::exit(1);
    }
    if let Some(error) = error.downcast_ref::<stratctl::OptionConflict>() {
        eprintln!("{}", error);
        std::process::exit(1);
    }

    // Print the error in detailed format for all other cases.
    eprintln!("{:?}", error);
    std::process::exit(1);
}
