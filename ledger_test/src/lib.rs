use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::{parse_macro_input, spanned::Spanned, FnArg, Ident, ItemFn, Pat, Signature, Type};

/// Turn a function into a test that runs against a fresh example ledger.
///
/// The function may accept, in any order, a `&mut Ledger` and a `ManualClock`;
/// the clock is shared with the ledger, so advancing it moves the ledger's time.
/// With `#[ledger_test(seeded)]`, the ledger is populated by `Ledger::seed_example`
/// before the test runs.
///
/// Once the test body returns, the ledger's state is verified, so every test
/// also checks that the operations it performed left the counters consistent.
#[proc_macro_attribute]
pub fn ledger_test(args: TokenStream, input: TokenStream) -> TokenStream {
    let mut item_fn = parse_macro_input!(input as ItemFn);

    let test_args = match check_sig(&item_fn.sig) {
        Ok(args) => args,
        Err(err) => return err.into_compile_error().into(),
    };

    let seed = match parse_macro_input!(args as Option<Ident>) {
        None => quote! {},
        Some(arg) if arg == "seeded" => quote! { ledger.seed_example(); },
        Some(arg) => {
            return syn::Error::new(arg.span(), "Expected `seeded` or nothing")
                .into_compile_error()
                .into()
        }
    };

    // Rename the body so the test can have its original name.
    let name = item_fn.sig.ident.clone();
    let body_name = format_ident!("{}_body", name);
    item_fn.sig.ident = body_name.clone();

    quote! {
        #[test]
        fn #name() {
            #item_fn

            log4rs_test_utils::test_logging::init_logging_once_for(
                ["election_ledger"],
                None,
                None,
            );

            let clock = crate::clock::ManualClock::example();
            let mut ledger = crate::ledger::Ledger::example(clock.clone());
            #seed

            #body_name(#(#test_args),*);

            if let Err(violation) = ledger.state().verify() {
                panic!("Test left the ledger inconsistent: {violation}");
            }
        }
    }
    .into()
}

/// Reject async or otherwise unsuitable tests, and work out what to pass for each parameter.
fn check_sig(sig: &Signature) -> Result<Vec<TokenStream2>, syn::Error> {
    if let Some(asyncness) = sig.asyncness {
        return Err(syn::Error::new(asyncness.span(), "Ledger tests are synchronous"));
    }

    let mut has_ledger = false;
    let mut has_clock = false;
    let mut args = vec![];

    for input in &sig.inputs {
        let pat_type = match input {
            FnArg::Typed(pat_type) => pat_type,
            FnArg::Receiver(_) => {
                return Err(syn::Error::new(
                    input.span(),
                    "Test must not take a receiver",
                ))
            }
        };
        if !matches!(&*pat_type.pat, Pat::Ident(_)) {
            return Err(syn::Error::new(
                pat_type.pat.span(),
                "Parameter pattern must be an identifier",
            ));
        }

        match &*pat_type.ty {
            Type::Reference(reference)
                if reference.mutability.is_some() && is_named(&reference.elem, "Ledger") =>
            {
                if has_ledger {
                    return Err(syn::Error::new(
                        input.span(),
                        "Test cannot accept more than one `&mut Ledger`",
                    ));
                }
                has_ledger = true;
                args.push(quote! { &mut ledger });
            }
            ty if is_named(ty, "ManualClock") => {
                if has_clock {
                    return Err(syn::Error::new(
                        input.span(),
                        "Test cannot accept more than one `ManualClock`",
                    ));
                }
                has_clock = true;
                args.push(quote! { clock.clone() });
            }
            _ => {
                return Err(syn::Error::new(
                    input.span(),
                    "Expected one of `ledger_ident: &mut Ledger` or `clock_ident: ManualClock`",
                ))
            }
        }
    }

    Ok(args)
}

/// Whether `ty` is a path whose last segment is `name`.
fn is_named(ty: &Type, name: &str) -> bool {
    match ty {
        Type::Path(type_path) => type_path
            .path
            .segments
            .last()
            .map_or(false, |segment| segment.ident == name),
        _ => false,
    }
}
