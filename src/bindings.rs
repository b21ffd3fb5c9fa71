//! Solidity ABI bindings for the CCIP contracts touched on a fork:
//! the LINK token, the Router, the EVM2EVM on/off-ramps and the v1.6
//! OnRamp.

use alloy::sol;

sol! {
    #![sol(all_derives = true)]

    library Client {
        struct EVMTokenAmount {
            address token;
            uint256 amount;
        }
    }

    library Internal {
        struct EVM2EVMMessage {
            uint64 sourceChainSelector;
            address sender;
            address receiver;
            uint64 sequenceNumber;
            uint256 gasLimit;
            bool strict;
            uint64 nonce;
            address feeToken;
            uint256 feeTokenAmount;
            bytes data;
            Client.EVMTokenAmount[] tokenAmounts;
            bytes[] sourceTokenData;
            bytes32 messageId;
        }

        struct RampMessageHeader {
            bytes32 messageId;
            uint64 sourceChainSelector;
            uint64 destChainSelector;
            uint64 sequenceNumber;
            uint64 nonce;
        }

        struct EVM2AnyTokenTransfer {
            address sourcePoolAddress;
            bytes destTokenAddress;
            bytes extraData;
            uint256 amount;
            bytes destExecData;
        }

        struct EVM2AnyRampMessage {
            RampMessageHeader header;
            address sender;
            bytes data;
            bytes receiver;
            bytes extraArgs;
            address feeToken;
            uint256 feeTokenAmount;
            uint256 feeValueJuels;
            EVM2AnyTokenTransfer[] tokenAmounts;
        }
    }

    interface LinkToken {
        function balanceOf(address account) external view returns (uint256);
        function transfer(address to, uint256 amount) external returns (bool);
        event Transfer(address indexed from, address indexed to, uint256 value);
    }

    interface Router {
        struct OffRamp {
            uint64 sourceChainSelector;
            address offRamp;
        }

        function getOffRamps() external view returns (OffRamp[] memory);

        error OnlyOffRamp();
        error UnsupportedDestinationChain(uint64 destChainSelector);
        error OffRampMismatch(uint64 chainSelector, address offRamp);
        error BadARMSignal();
    }

    interface EVM2EVMOnRamp {
        event CCIPSendRequested(Internal.EVM2EVMMessage message);
    }

    interface EVM2EVMOffRamp {
        /// EVM2EVMOffRamp v1.2 to v1.4 signature; v1.5 adds `uint32[] tokenGasOverrides`.
        function executeSingleMessage(
            Internal.EVM2EVMMessage memory message,
            bytes[] memory offchainTokenData
        ) external;

        error CanOnlySelfCall();
        error ReceiverError(bytes err);
        error TokenHandlingError(bytes err);
        error TokenDataMismatch(uint64 sequenceNumber);
        error UnsupportedNumberOfTokens(uint64 sequenceNumber);
        error ZeroAddressNotAllowed();
        error CursedByRMN();
    }

    interface OnRamp {
        event CCIPMessageSent(
            uint64 indexed destChainSelector,
            uint64 indexed sequenceNumber,
            Internal.EVM2AnyRampMessage message
        );
    }
}
