//! Contract trait generation

/// Generate the typed glue around a service contract
///
/// One invocation produces three items from a single trait definition:
///
/// - the contract trait itself, usable like any hand-written
///   `#[async_trait]` trait;
/// - a dispatch adapter (`dispatch:`) that turns any implementation of
///   the trait into a [`Callable`](crate::Callable) advertising an
///   interface-shaped [`ContractDescriptor`](crate::ContractDescriptor),
///   ready to sit behind a proxy;
/// - a typed client (`client:`) that speaks to any `Callable` carrying
///   the contract and hands back the trait's own result types.
///
/// Method errors cross the dynamic seam boxed and come back out through
/// [`CallError::recover`](crate::CallError::recover): when the
/// implementation raises an `E`, the typed client returns that very
/// value, not a copy or a re-wrap.
///
/// Every method must take `&self` plus owned serializable parameters and
/// return `Result<T, E>` with `T` serializable and `E` implementing
/// `std::error::Error + From<CallError> + Send + Sync + 'static`.
/// Implementations annotate with `#[async_trait::async_trait]`, same as
/// for a hand-written trait.
///
/// # Example
///
/// ```
/// use veneer_core::{CallError, contract};
///
/// contract! {
///     pub trait Calculator {
///         async fn add(&self, a: i64, b: i64) -> Result<i64, CalcError>;
///     }
///     dispatch: CalculatorDispatch;
///     client: CalculatorClient;
/// }
///
/// #[derive(Debug, thiserror::Error)]
/// pub enum CalcError {
///     #[error(transparent)]
///     Call(#[from] CallError),
/// }
///
/// struct Adder;
///
/// #[async_trait::async_trait]
/// impl Calculator for Adder {
///     async fn add(&self, a: i64, b: i64) -> Result<i64, CalcError> {
///         Ok(a + b)
///     }
/// }
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), CalcError> {
/// let client = CalculatorClient::new(std::sync::Arc::new(CalculatorDispatch::new(Adder)));
/// assert_eq!(client.add(2, 2).await?, 4);
/// # Ok(())
/// # }
/// ```
#[macro_export]
macro_rules! contract {
    (
        $(#[$attr:meta])*
        $vis:vis trait $name:ident {
            $(
                $(#[$mattr:meta])*
                async fn $method:ident(&self $(, $param:ident : $ptype:ty)*) -> Result<$ok:ty, $err:ty>;
            )+
        }
        dispatch: $dispatch:ident;
        client: $client:ident;
    ) => {
        $(#[$attr])*
        #[::async_trait::async_trait]
        $vis trait $name: Send + Sync {
            $(
                $(#[$mattr])*
                async fn $method(&self $(, $param: $ptype)*) -> Result<$ok, $err>;
            )+
        }

        $vis struct $dispatch<T: $name> {
            service: T,
            contract: $crate::ContractDescriptor,
        }

        impl<T: $name> $dispatch<T> {
            $vis fn new(service: T) -> Self {
                let contract = $crate::ContractDescriptor::new(
                    stringify!($name),
                    $crate::ContractShape::Interface,
                )
                $(.with_method(stringify!($method), &[$(stringify!($param)),*]))+;
                Self { service, contract }
            }

            $vis fn service(&self) -> &T {
                &self.service
            }

            $vis fn into_inner(self) -> T {
                self.service
            }
        }

        #[::async_trait::async_trait]
        impl<T: $name> $crate::Callable for $dispatch<T> {
            fn contract(&self) -> &$crate::ContractDescriptor {
                &self.contract
            }

            async fn call(
                &self,
                method: &str,
                args: Vec<$crate::Value>,
            ) -> $crate::CallResult {
                $(
                    if method == stringify!($method) {
                        let params: &[&str] = &[$(stringify!($param)),*];
                        if args.len() != params.len() {
                            return Err($crate::CallError::arity_mismatch(
                                method,
                                params.len(),
                                args.len(),
                            ));
                        }

                        #[allow(unused_mut, unused_variables)]
                        let mut args = args.into_iter();
                        $(
                            let $param: $ptype =
                                match $crate::from_value(args.next().unwrap_or($crate::Value::Null)) {
                                    Ok(value) => value,
                                    Err(err) => {
                                        return Err($crate::CallError::invalid_argument(
                                            method,
                                            stringify!($param),
                                            err.to_string(),
                                        ));
                                    }
                                };
                        )*

                        return match self.service.$method($($param),*).await {
                            Ok(value) => $crate::to_value(value).map_err(|err| {
                                $crate::CallError::invalid_return(method, err.to_string())
                            }),
                            Err(err) => Err($crate::CallError::target(method, err)),
                        };
                    }
                )+
                Err($crate::CallError::unknown_method(stringify!($name), method))
            }
        }

        impl<T: $name> ::std::fmt::Debug for $dispatch<T> {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.debug_struct(stringify!($dispatch))
                    .field("contract", &self.contract.name)
                    .finish()
            }
        }

        $vis struct $client {
            inner: ::std::sync::Arc<dyn $crate::Callable>,
        }

        impl $client {
            $vis fn new(inner: ::std::sync::Arc<dyn $crate::Callable>) -> Self {
                Self { inner }
            }
        }

        #[::async_trait::async_trait]
        impl $name for $client {
            $(
                async fn $method(&self $(, $param: $ptype)*) -> Result<$ok, $err> {
                    #[allow(unused_mut)]
                    let mut args: Vec<$crate::Value> = Vec::new();
                    $(
                        args.push(
                            $crate::to_value($param)
                                .map_err(|err| {
                                    $crate::CallError::invalid_argument(
                                        stringify!($method),
                                        stringify!($param),
                                        err.to_string(),
                                    )
                                })
                                .map_err(<$err>::from)?,
                        );
                    )*

                    let outcome = $crate::Callable::call(
                        self.inner.as_ref(),
                        stringify!($method),
                        args,
                    )
                    .await;

                    match outcome {
                        Ok(value) => $crate::from_value::<$ok>(value).map_err(|err| {
                            <$err>::from($crate::CallError::invalid_return(
                                stringify!($method),
                                err.to_string(),
                            ))
                        }),
                        Err(err) => Err(err.recover::<$err>()),
                    }
                }
            )+
        }

        impl ::std::clone::Clone for $client {
            fn clone(&self) -> Self {
                Self {
                    inner: ::std::sync::Arc::clone(&self.inner),
                }
            }
        }

        impl ::std::fmt::Debug for $client {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.debug_struct(stringify!($client))
                    .field(
                        "contract",
                        &$crate::Callable::contract(self.inner.as_ref()).name,
                    )
                    .finish()
            }
        }
    };
}
